use crate::api::auth::CurrentUser;
use crate::api::error::ApiResult;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::AppState;
use crate::error::MarketError;
use crate::models::{AppointmentId, AppointmentStatus};
use crate::services::appointments::{AppointmentRequest, AppointmentView};
use crate::store::PartyRole;
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    status: Option<String>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    CurrentUser(buyer): CurrentUser,
    ApiJson(request): ApiJson<AppointmentRequest>,
) -> ApiResult<(StatusCode, Json<AppointmentView>)> {
    let appointment = state.market.appointments.create(buyer, request).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// `?role=buyer|seller`; anything else lists both sides
pub async fn list(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<Vec<AppointmentView>>> {
    let role = match query.role.as_deref() {
        Some("buyer") => PartyRole::Buyer,
        Some("seller") => PartyRole::Seller,
        _ => PartyRole::Either,
    };
    Ok(Json(state.market.appointments.list(user, role).await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<AppointmentId>,
) -> ApiResult<Json<AppointmentView>> {
    Ok(Json(state.market.appointments.get(id, user).await?))
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<AppointmentId>,
    ApiJson(update): ApiJson<StatusUpdate>,
) -> ApiResult<Json<AppointmentView>> {
    let status: AppointmentStatus = update
        .status
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| MarketError::validation("Invalid status"))?;

    Ok(Json(state.market.appointments.update_status(id, user, status).await?))
}

pub async fn cancel(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<AppointmentId>,
) -> ApiResult<Json<Value>> {
    state.market.appointments.cancel(id, user).await?;
    Ok(Json(json!({ "message": "Appointment cancelled successfully" })))
}

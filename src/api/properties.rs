use crate::api::auth::CurrentUser;
use crate::api::error::ApiResult;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::AppState;
use crate::models::{Property, PropertyId};
use crate::services::appointments::AppointmentView;
use crate::services::bids::{BidBoard, BidView};
use crate::services::catalog::PropertyDraft;
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct BidRequest {
    amount: Option<f64>,
}

pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Property>>> {
    Ok(Json(state.market.catalog.list().await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<PropertyId>,
) -> ApiResult<Json<Property>> {
    Ok(Json(state.market.catalog.get(id).await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    CurrentUser(seller): CurrentUser,
    ApiJson(draft): ApiJson<PropertyDraft>,
) -> ApiResult<(StatusCode, Json<Property>)> {
    let property = state.market.catalog.create(seller, draft).await?;
    Ok((StatusCode::CREATED, Json(property)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    CurrentUser(seller): CurrentUser,
    ApiPath(id): ApiPath<PropertyId>,
    ApiJson(draft): ApiJson<PropertyDraft>,
) -> ApiResult<Json<Property>> {
    Ok(Json(state.market.catalog.update(id, seller, draft).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    CurrentUser(seller): CurrentUser,
    ApiPath(id): ApiPath<PropertyId>,
) -> ApiResult<Json<Value>> {
    state.market.catalog.delete(id, seller).await?;
    Ok(Json(json!({ "message": "Property removed" })))
}

pub async fn place_bid(
    State(state): State<Arc<AppState>>,
    CurrentUser(bidder): CurrentUser,
    ApiPath(id): ApiPath<PropertyId>,
    ApiJson(request): ApiJson<BidRequest>,
) -> ApiResult<(StatusCode, Json<Vec<BidView>>)> {
    let amount = request.amount.unwrap_or(0.0);
    let bids = state.market.bids.place_bid(id, bidder, amount).await?;
    Ok((StatusCode::CREATED, Json(bids)))
}

pub async fn bids(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<PropertyId>,
) -> ApiResult<Json<BidBoard>> {
    Ok(Json(state.market.bids.get_bids(id).await?))
}

pub async fn appointments(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<PropertyId>,
) -> ApiResult<Json<Vec<AppointmentView>>> {
    Ok(Json(state.market.appointments.list_active_for_property(id).await?))
}

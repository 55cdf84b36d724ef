use crate::api::error::ApiResult;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::AppState;
use crate::models::{User, UserId};
use crate::services::users::NewUser;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<NewUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.market.users.register(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Public profile, including the seller's cached rating
pub async fn get(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<UserId>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.market.users.get(id).await?))
}

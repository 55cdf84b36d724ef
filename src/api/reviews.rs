use crate::api::auth::CurrentUser;
use crate::api::error::ApiResult;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::AppState;
use crate::models::{PropertyId, UserId};
use crate::services::reviews::{PropertyReviews, ReviewRequest, ReviewView};
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

pub async fn create(
    State(state): State<Arc<AppState>>,
    CurrentUser(buyer): CurrentUser,
    ApiJson(request): ApiJson<ReviewRequest>,
) -> ApiResult<(StatusCode, Json<ReviewView>)> {
    let review = state.market.reviews.create(buyer, request).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn for_seller(
    State(state): State<Arc<AppState>>,
    ApiPath(seller): ApiPath<UserId>,
) -> ApiResult<Json<Vec<ReviewView>>> {
    Ok(Json(state.market.reviews.list_for_seller(seller).await?))
}

pub async fn for_property(
    State(state): State<Arc<AppState>>,
    ApiPath(property): ApiPath<PropertyId>,
) -> ApiResult<Json<PropertyReviews>> {
    Ok(Json(state.market.reviews.list_for_property(property).await?))
}

use crate::api::auth::CurrentUser;
use crate::api::error::ApiResult;
use crate::api::extract::{ApiPath, ApiQuery};
use crate::api::AppState;
use crate::models::{Notification, NotificationId};
use crate::services::notifications::NotificationList;
use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    limit: Option<usize>,
    #[serde(default)]
    unread_only: bool,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<NotificationList>> {
    let list = state
        .market
        .notifications
        .list_for_user(user, query.limit, query.unread_only)
        .await?;
    Ok(Json(list))
}

pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<NotificationId>,
) -> ApiResult<Json<Notification>> {
    Ok(Json(state.market.notifications.mark_read(id, user).await?))
}

pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Value>> {
    let updated = state.market.notifications.mark_all_read(user).await?;
    Ok(Json(json!({
        "message": "All notifications marked as read",
        "updated": updated,
    })))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<NotificationId>,
) -> ApiResult<Json<Value>> {
    state.market.notifications.delete(id, user).await?;
    Ok(Json(json!({ "message": "Notification deleted" })))
}

pub async fn delete_all(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Value>> {
    let deleted = state.market.notifications.delete_all(user).await?;
    Ok(Json(json!({
        "message": "All notifications deleted",
        "deleted": deleted,
    })))
}

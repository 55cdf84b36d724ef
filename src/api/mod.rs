pub mod appointments;
pub mod auth;
pub mod error;
pub mod extract;
pub mod notifications;
pub mod properties;
pub mod reviews;
pub mod users;

use crate::services::Marketplace;
use auth::TokenVerifier;
use axum::{
    http::{header, Method},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub struct AppState {
    pub market: Arc<Marketplace>,
    pub tokens: Arc<dyn TokenVerifier>,
}

/// Every route lives under `/api`
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    let api = Router::new()
        .route("/health", get(health))
        .route("/users", post(users::register))
        .route("/users/:id", get(users::get))
        .route("/properties", get(properties::list).post(properties::create))
        .route(
            "/properties/:id",
            get(properties::get)
                .put(properties::update)
                .delete(properties::delete),
        )
        .route("/properties/:id/bid", post(properties::place_bid))
        .route("/properties/:id/bids", get(properties::bids))
        .route("/properties/:id/appointments", get(properties::appointments))
        .route(
            "/appointments",
            get(appointments::list).post(appointments::create),
        )
        .route(
            "/appointments/:id",
            get(appointments::get).delete(appointments::cancel),
        )
        .route("/appointments/:id/status", patch(appointments::update_status))
        .route("/reviews", post(reviews::create))
        .route("/reviews/seller/:seller_id", get(reviews::for_seller))
        .route("/reviews/property/:property_id", get(reviews::for_property))
        .route(
            "/notifications",
            get(notifications::list).delete(notifications::delete_all),
        )
        .route("/notifications/read-all", patch(notifications::mark_all_read))
        .route(
            "/notifications/:id",
            patch(notifications::mark_read).delete(notifications::delete),
        )
        .route("/notifications/:id/read", patch(notifications::mark_read));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests;

use crate::error::MarketError;
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// HTTP face of [`MarketError`]: a status code and a `{"message": ...}` body
#[derive(Debug)]
pub struct ApiError(pub MarketError);

impl From<MarketError> for ApiError {
    fn from(err: MarketError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(MarketError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(MarketError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(MarketError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            MarketError::Validation(_) | MarketError::InvalidOperation(_) => {
                StatusCode::BAD_REQUEST
            }
            MarketError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            MarketError::Forbidden(_) => StatusCode::FORBIDDEN,
            MarketError::NotFound(_) => StatusCode::NOT_FOUND,
            MarketError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match self.0 {
            MarketError::Unexpected(e) => {
                error!("Unexpected failure: {e:#}");
                "Something went wrong".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

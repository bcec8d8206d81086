// API error type mapped onto HTTP status codes
use crate::domain::ValidationError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// The two failure kinds the API reports, plus not-found, which is a valid
/// empty result rather than an error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed input, reported as 400 naming the offending field.
    #[error("{0}")]
    Validation(#[from] ValidationError),
    /// The requested row does not exist, 404.
    #[error("not found")]
    NotFound,
    /// Remote call failed; the detail is logged, never returned, 500.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            ApiError::Backend(err) => {
                tracing::error!("backend failure: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::models::ErrorResponse;

/// Request-level failures. Upstream failures never surface here.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No question provided")]
    Validation,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

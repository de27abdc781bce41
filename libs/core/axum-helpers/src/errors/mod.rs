pub mod handlers;
pub mod responses;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Message used when a server-side failure carries no text of its own.
pub const SERVER_ERROR: &str = "Server Error";

/// Failure envelope returned by every error path.
///
/// # JSON Example
///
/// ```json
/// { "success": false, "error": "Duplicate field value entered" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human-readable error message
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Application error type that can be converted to HTTP responses.
///
/// Domain crates translate their own error enums into this type; it owns the
/// final status code and envelope rendering.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryExtractorRejection(#[from] QueryRejection),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    /// Status code and client-facing message for this error.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::JsonExtractorRejection(e) => (StatusCode::BAD_REQUEST, e.body_text()),
            AppError::QueryExtractorRejection(e) => (StatusCode::BAD_REQUEST, e.body_text()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InternalServerError(msg) if msg.trim().is_empty() => {
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.to_string())
            }
            AppError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        // Domain conversions into AppError log the original failure themselves.
        if matches!(
            self,
            AppError::JsonExtractorRejection(_) | AppError::QueryExtractorRejection(_)
        ) {
            tracing::info!(status = status.as_u16(), "{}", message);
        }

        error_response(status, message)
    }
}

/// Helper function to create error responses.
///
/// # Example
///
/// ```rust,ignore
/// use axum_helpers::errors::error_response;
/// use axum::http::StatusCode;
///
/// let response = error_response(StatusCode::NOT_FOUND, "Route not found");
/// ```
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

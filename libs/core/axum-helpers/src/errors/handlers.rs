use axum::{http::StatusCode, response::Response};

use super::error_response;

/// Message for requests that match no route.
pub const ROUTE_NOT_FOUND: &str = "Route not found";

/// Fallback handler for unmatched paths.
///
/// Install with `Router::fallback(not_found)`.
pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, ROUTE_NOT_FOUND)
}

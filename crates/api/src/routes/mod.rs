//! Route definitions and framework-level fallbacks.

pub mod health;
pub mod widgets;

use axum::http::{Method, StatusCode, Uri};
use axum::response::Response;

use crate::error::http_error;

/// Fallback for unmatched paths.
///
/// Routing 404s are too frequent to be actionable, so unlike taxonomy
/// errors they are not logged.
pub async fn not_found() -> Response {
    http_error(StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND", "Not Found")
}

/// Fallback for matched paths with an unsupported method.
pub async fn method_not_allowed(method: Method, uri: Uri) -> Response {
    tracing::warn!(method = %method, path = %uri.path(), "Method not allowed");
    http_error(
        StatusCode::METHOD_NOT_ALLOWED,
        "METHOD_NOT_ALLOWED",
        "Method Not Allowed",
    )
}

//! Response post-processing middleware.
//!
//! Every error body leaving the service is enriched with the request
//! correlation id and a timestamp, so clients and log lines can be
//! matched up. In debug mode the stashed internal cause is exposed as
//! well; production responses never carry it.

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::header::CONTENT_LENGTH;
use axum::middleware::Next;
use axum::response::Response;
use serde_json::{json, Value};

use crate::error::ErrorCause;
use crate::state::AppState;

/// Largest error body the enrichment middleware will buffer. Error
/// bodies are small; anything bigger is passed through untouched.
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

/// Add `request_id` and `timestamp` to canonical error bodies.
///
/// Runs inside the request-id layers, so the `x-request-id` header is
/// already set on the request. Non-error responses and non-canonical
/// bodies (e.g. plain-text timeouts) pass through unchanged.
pub async fn enrich_error_body(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => {
            parts.headers.remove(CONTENT_LENGTH);
            return Response::from_parts(parts, Body::empty());
        }
    };

    let mut json: Value = match serde_json::from_slice(&bytes) {
        Ok(json) => json,
        Err(_) => return Response::from_parts(parts, Body::from(bytes)),
    };

    if json.get("error").is_some() {
        json["request_id"] = Value::String(
            request_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        );
        json["timestamp"] = json!(epoch_seconds());

        if state.config.debug {
            if let Some(cause) = parts.extensions.get::<ErrorCause>() {
                if !json["details"].is_object() {
                    json["details"] = json!({});
                }
                json["details"]["internal_message"] = Value::String(cause.0.clone());
            }
        }
    }

    match serde_json::to_vec(&json) {
        Ok(buf) => {
            parts.headers.remove(CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(buf))
        }
        Err(_) => Response::from_parts(parts, Body::from(bytes)),
    }
}

/// Seconds since the Unix epoch as a float.
fn epoch_seconds() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

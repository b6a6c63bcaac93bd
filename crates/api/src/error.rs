//! Application-level error type for HTTP handlers.
//!
//! Wraps the [`ApiError`] taxonomy and the repository errors, and adds
//! request-boundary variants. Implements [`IntoResponse`] to produce the
//! canonical `{error, message, details}` JSON body; the error-enrichment
//! middleware adds `request_id` and `timestamp` on the way out.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use widgets_core::error::{ApiError, FieldErrors};
use widgets_db::repositories::WidgetRepoError;

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A taxonomy error; code and status come from the variant itself.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A typed repository failure.
    #[error(transparent)]
    Repo(#[from] WidgetRepoError),

    /// Request-boundary schema failure: malformed payloads and
    /// out-of-range parameters, with every failing field enumerated.
    #[error("Request validation failed")]
    SchemaValidation { field_errors: FieldErrors },

    /// Anything unexpected. The message is internal-only.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Boundary rejection for a single field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut field_errors = FieldErrors::new();
        field_errors.insert(field.into(), message.into());
        AppError::SchemaValidation { field_errors }
    }
}

/// Internal cause of a failure, stashed in response extensions so the
/// enrichment middleware can expose it when debug mode is on. Never
/// serialized into production responses.
#[derive(Debug, Clone)]
pub struct ErrorCause(pub String);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::invalid_field("body", rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::invalid_field("path", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::invalid_field("query", rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body, cause) = match &self {
            AppError::Api(err) => (
                StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                err.to_body(),
                None,
            ),
            AppError::Repo(err) => repo_error_response(err),
            AppError::SchemaValidation { field_errors } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "VALIDATION_ERROR",
                    "message": "Request validation failed",
                    "details": { "field_errors": field_errors },
                }),
                None,
            ),
            AppError::Internal(cause) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "INTERNAL_SERVER_ERROR",
                    "message": "An unexpected error occurred",
                    "details": {},
                }),
                Some(cause.clone()),
            ),
        };

        // Every taxonomy error is logged before the response is emitted;
        // routing-level 404s bypass this path entirely (see routes::not_found).
        let code = body["error"].as_str().unwrap_or("UNKNOWN");
        if status.is_server_error() {
            tracing::error!(
                code,
                status = status.as_u16(),
                cause = cause.as_deref().unwrap_or(""),
                "Request failed: {self}"
            );
        } else {
            tracing::warn!(code, status = status.as_u16(), "Request rejected: {self}");
        }

        let mut response = (status, Json(body)).into_response();
        if let Some(cause) = cause {
            response.extensions_mut().insert(ErrorCause(cause));
        }
        response
    }
}

/// Map a repository failure to its taxonomy response.
///
/// `NotFound` becomes the widget-specific 404; storage failures become a
/// sanitized `DATABASE_ERROR` naming only the operation, with the
/// underlying cause preserved for logging and debug mode.
fn repo_error_response(err: &WidgetRepoError) -> (StatusCode, Value, Option<String>) {
    match err {
        WidgetRepoError::NotFound { id } => {
            let api = ApiError::widget_not_found(*id);
            (StatusCode::NOT_FOUND, api.to_body(), None)
        }
        WidgetRepoError::Create(cause) => database_response("create", cause),
        WidgetRepoError::Update(cause) => database_response("update", cause),
        WidgetRepoError::Delete(cause) => database_response("delete", cause),
        WidgetRepoError::Query(cause) => database_response("query", cause),
    }
}

fn database_response(
    operation: &'static str,
    cause: &sqlx::Error,
) -> (StatusCode, Value, Option<String>) {
    let api = ApiError::database(operation);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        api.to_body(),
        Some(cause.to_string()),
    )
}

/// Build a taxonomy-shaped response for framework-level HTTP errors
/// (unmatched routes, wrong methods) that never touch a handler.
pub fn http_error(status: StatusCode, code: &'static str, message: &str) -> Response {
    let body = json!({
        "error": code,
        "message": message,
        "details": {},
    });
    (status, Json(body)).into_response()
}

/// Panic recovery handler for `CatchPanicLayer`: logs and returns the
/// generic 500 body instead of tearing down the connection.
pub fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");

    let mut response = http_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_SERVER_ERROR",
        "An unexpected error occurred",
    );
    response.extensions_mut().insert(ErrorCause(detail));
    response
}

//! Closed error taxonomy for the widgets service.
//!
//! Each variant carries a stable machine-readable code, a default HTTP
//! status, and a structured details payload. The HTTP layer switches on
//! the variant to build the response; nothing here depends on a web
//! framework, so the taxonomy can also be exercised from CLIs and tests.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::types::DbId;

/// Per-field validation messages, keyed by field name.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// General field-level validation failure.
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: FieldErrors,
    },

    /// A resource of any type was not found.
    #[error("{resource_type} with ID {resource_id} not found")]
    ResourceNotFound {
        resource_type: &'static str,
        resource_id: String,
    },

    /// Generic storage failure.
    #[error("{message}")]
    Database {
        message: String,
        operation: Option<&'static str>,
    },

    /// A domain rule was violated.
    #[error("{message}")]
    BusinessLogic {
        message: String,
        rule: Option<String>,
    },

    /// Caller is not authenticated. Unused by widget flows.
    #[error("{message}")]
    Authentication { message: String },

    /// Caller lacks permission. Unused by widget flows.
    #[error("{message}")]
    Authorization {
        message: String,
        resource: Option<String>,
        action: Option<String>,
    },

    /// Caller exceeded a rate limit. Unused by widget flows.
    #[error("{message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    /// A downstream dependency is unavailable. Unused by widget flows.
    #[error("{message}")]
    ExternalService {
        message: String,
        service_name: String,
    },

    /// No widget with the given id.
    #[error("Widget with ID {widget_id} not found")]
    WidgetNotFound { widget_id: DbId },

    /// Widget-specific validation failure.
    #[error("{message}")]
    WidgetValidation {
        message: String,
        field_errors: FieldErrors,
        widget_id: Option<DbId>,
    },

    /// A widget with the same value already exists for a unique field.
    #[error("Widget with {field} '{value}' already exists")]
    WidgetDuplicate { field: String, value: String },
}

impl ApiError {
    /// Stable machine-readable code for this error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::ResourceNotFound { .. } => "RESOURCE_NOT_FOUND",
            ApiError::Database { .. } => "DATABASE_ERROR",
            ApiError::BusinessLogic { .. } => "BUSINESS_LOGIC_ERROR",
            ApiError::Authentication { .. } => "AUTHENTICATION_ERROR",
            ApiError::Authorization { .. } => "AUTHORIZATION_ERROR",
            ApiError::RateLimit { .. } => "RATE_LIMIT_ERROR",
            ApiError::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
            ApiError::WidgetNotFound { .. } => "WIDGET_NOT_FOUND",
            ApiError::WidgetValidation { .. } => "WIDGET_VALIDATION_ERROR",
            ApiError::WidgetDuplicate { .. } => "WIDGET_DUPLICATE_ERROR",
        }
    }

    /// Default HTTP status code for this error kind.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation { .. } => 400,
            ApiError::ResourceNotFound { .. } => 404,
            ApiError::Database { .. } => 500,
            ApiError::BusinessLogic { .. } => 400,
            ApiError::Authentication { .. } => 401,
            ApiError::Authorization { .. } => 403,
            ApiError::RateLimit { .. } => 429,
            ApiError::ExternalService { .. } => 503,
            ApiError::WidgetNotFound { .. } => 404,
            ApiError::WidgetValidation { .. } => 400,
            ApiError::WidgetDuplicate { .. } => 409,
        }
    }

    /// Structured details payload for the response body.
    pub fn details(&self) -> Map<String, Value> {
        let mut details = Map::new();
        match self {
            ApiError::Validation { field_errors, .. } => {
                details.insert("field_errors".into(), field_errors_value(field_errors));
            }
            ApiError::ResourceNotFound {
                resource_type,
                resource_id,
            } => {
                details.insert("resource_type".into(), json!(resource_type));
                details.insert("resource_id".into(), json!(resource_id));
            }
            ApiError::Database { operation, .. } => {
                if let Some(op) = operation {
                    details.insert("operation".into(), json!(op));
                }
            }
            ApiError::BusinessLogic { rule, .. } => {
                if let Some(rule) = rule {
                    details.insert("violated_rule".into(), json!(rule));
                }
            }
            ApiError::Authentication { .. } => {}
            ApiError::Authorization {
                resource, action, ..
            } => {
                if let Some(resource) = resource {
                    details.insert("resource".into(), json!(resource));
                }
                if let Some(action) = action {
                    details.insert("action".into(), json!(action));
                }
            }
            ApiError::RateLimit { retry_after, .. } => {
                if let Some(secs) = retry_after {
                    details.insert("retry_after".into(), json!(secs));
                }
            }
            ApiError::ExternalService { service_name, .. } => {
                details.insert("service_name".into(), json!(service_name));
            }
            ApiError::WidgetNotFound { widget_id } => {
                details.insert("widget_id".into(), json!(widget_id));
            }
            ApiError::WidgetValidation {
                field_errors,
                widget_id,
                ..
            } => {
                if !field_errors.is_empty() {
                    details.insert("field_errors".into(), field_errors_value(field_errors));
                }
                if let Some(id) = widget_id {
                    details.insert("widget_id".into(), json!(id));
                }
            }
            ApiError::WidgetDuplicate { field, value } => {
                details.insert("duplicate_field".into(), json!(field));
                details.insert("duplicate_value".into(), json!(value));
            }
        }
        details
    }

    /// Canonical serialization: `{error, message, details}`.
    pub fn to_body(&self) -> Value {
        json!({
            "error": self.error_code(),
            "message": self.to_string(),
            "details": Value::Object(self.details()),
        })
    }

    // -- Constructors with the default messages -----------------------------

    pub fn validation(field_errors: FieldErrors) -> Self {
        ApiError::Validation {
            message: "Validation failed".to_string(),
            field_errors,
        }
    }

    pub fn resource_not_found(resource_type: &'static str, resource_id: impl ToString) -> Self {
        ApiError::ResourceNotFound {
            resource_type,
            resource_id: resource_id.to_string(),
        }
    }

    pub fn database(operation: &'static str) -> Self {
        ApiError::Database {
            message: "Database operation failed".to_string(),
            operation: Some(operation),
        }
    }

    pub fn business_logic(message: impl Into<String>, rule: Option<String>) -> Self {
        ApiError::BusinessLogic {
            message: message.into(),
            rule,
        }
    }

    pub fn authentication() -> Self {
        ApiError::Authentication {
            message: "Authentication required".to_string(),
        }
    }

    pub fn authorization(resource: Option<String>, action: Option<String>) -> Self {
        ApiError::Authorization {
            message: "Insufficient permissions".to_string(),
            resource,
            action,
        }
    }

    pub fn rate_limit(retry_after: Option<u64>) -> Self {
        ApiError::RateLimit {
            message: "Rate limit exceeded".to_string(),
            retry_after,
        }
    }

    pub fn external_service(service_name: impl Into<String>) -> Self {
        ApiError::ExternalService {
            message: "External service unavailable".to_string(),
            service_name: service_name.into(),
        }
    }

    pub fn widget_not_found(widget_id: DbId) -> Self {
        ApiError::WidgetNotFound { widget_id }
    }

    pub fn widget_validation(field_errors: FieldErrors, widget_id: Option<DbId>) -> Self {
        ApiError::WidgetValidation {
            message: "Widget validation failed".to_string(),
            field_errors,
            widget_id,
        }
    }

    pub fn widget_duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        ApiError::WidgetDuplicate {
            field: field.into(),
            value: value.into(),
        }
    }
}

fn field_errors_value(field_errors: &FieldErrors) -> Value {
    Value::Object(
        field_errors
            .iter()
            .map(|(k, v)| (k.clone(), json!(v)))
            .collect(),
    )
}

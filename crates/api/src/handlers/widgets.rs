//! Handlers for the widget CRUD endpoints.
//!
//! All schema validation happens here, before the repository is touched:
//! malformed payloads and out-of-range parameters are rejected with a 422
//! enumerating every failing field. The repository only ever sees trimmed,
//! validated input.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use widgets_core::error::{ApiError, FieldErrors};
use widgets_core::pagination::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use widgets_core::types::DbId;
use widgets_core::widget::{validate_name, validate_number_of_parts, DEFAULT_ORDER_FIELD};
use widgets_db::models::widget::{CreateWidget, UpdateWidget, Widget};
use widgets_db::repositories::{is_unique_violation, WidgetPage, WidgetRepo, WidgetRepoError};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for the paginated listing.
#[derive(Debug, serde::Deserialize)]
pub struct ListWidgetsParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub order_by: Option<String>,
    pub order_desc: Option<bool>,
}

/// Query parameters for the name search.
#[derive(Debug, serde::Deserialize)]
pub struct SearchWidgetsParams {
    pub pattern: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /widgets
///
/// Create a new widget. The stored name is the trimmed form.
pub async fn create_widget(
    State(state): State<AppState>,
    payload: Result<Json<CreateWidget>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(mut input) = payload?;

    let mut field_errors = FieldErrors::new();
    match validate_name(&input.name) {
        Ok(trimmed) => input.name = trimmed,
        Err(message) => {
            field_errors.insert("name".to_string(), message);
        }
    }
    if let Err(message) = validate_number_of_parts(input.number_of_parts) {
        field_errors.insert("number_of_parts".to_string(), message);
    }
    if !field_errors.is_empty() {
        return Err(AppError::SchemaValidation { field_errors });
    }

    let widget = match WidgetRepo::create(&state.pool, &input).await {
        Ok(widget) => widget,
        // No unique constraint exists on widgets today; classified here
        // so a future one maps to 409 instead of a generic 500.
        Err(WidgetRepoError::Create(ref cause)) if is_unique_violation(cause) => {
            return Err(ApiError::widget_duplicate("name", input.name.clone()).into());
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(widget_id = widget.id, name = %widget.name, "Widget created");

    Ok((StatusCode::CREATED, Json(widget)))
}

/// GET /widgets?page=&size=&order_by=&order_desc=
///
/// Paginated, ordered listing. Out-of-range `page`/`size` are rejected
/// here rather than silently clamped; an unknown `order_by` falls back
/// to `id` in the repository.
pub async fn list_widgets(
    State(state): State<AppState>,
    params: Result<Query<ListWidgetsParams>, QueryRejection>,
) -> AppResult<Json<WidgetPage>> {
    let Query(params) = params?;

    let page = params.page.unwrap_or(DEFAULT_PAGE);
    let size = params.size.unwrap_or(DEFAULT_PAGE_SIZE);

    let mut field_errors = FieldErrors::new();
    if page < 1 {
        field_errors.insert(
            "page".to_string(),
            "Page must be greater than or equal to 1".to_string(),
        );
    }
    if !(1..=MAX_PAGE_SIZE).contains(&size) {
        field_errors.insert(
            "size".to_string(),
            format!("Size must be between 1 and {MAX_PAGE_SIZE}"),
        );
    }
    if !field_errors.is_empty() {
        return Err(AppError::SchemaValidation { field_errors });
    }

    let result = WidgetRepo::list(
        &state.pool,
        page,
        size,
        params.order_by.as_deref().unwrap_or(DEFAULT_ORDER_FIELD),
        params.order_desc.unwrap_or(false),
    )
    .await?;

    Ok(Json(result))
}

/// GET /widgets/search?pattern=
///
/// Case-insensitive substring search over names, ordered by name.
pub async fn search_widgets(
    State(state): State<AppState>,
    params: Result<Query<SearchWidgetsParams>, QueryRejection>,
) -> AppResult<Json<Vec<Widget>>> {
    let Query(params) = params?;

    if params.pattern.trim().is_empty() {
        return Err(AppError::invalid_field(
            "pattern",
            "Search pattern is required",
        ));
    }

    let widgets = WidgetRepo::find_by_name_pattern(&state.pool, &params.pattern).await?;
    Ok(Json(widgets))
}

/// GET /widgets/{id}
pub async fn get_widget(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<Widget>> {
    let Path(id) = id?;
    let widget = WidgetRepo::get_by_id(&state.pool, id).await?;
    Ok(Json(widget))
}

/// PUT /widgets/{id}
///
/// Partial update: only provided fields change. An empty payload returns
/// the widget unchanged.
pub async fn update_widget(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<UpdateWidget>, JsonRejection>,
) -> AppResult<Json<Widget>> {
    let Path(id) = id?;
    let Json(mut input) = payload?;

    let mut field_errors = FieldErrors::new();
    if let Some(name) = input.name.take() {
        match validate_name(&name) {
            Ok(trimmed) => input.name = Some(trimmed),
            Err(message) => {
                field_errors.insert("name".to_string(), message);
            }
        }
    }
    if let Some(parts) = input.number_of_parts {
        if let Err(message) = validate_number_of_parts(parts) {
            field_errors.insert("number_of_parts".to_string(), message);
        }
    }
    if !field_errors.is_empty() {
        return Err(AppError::SchemaValidation { field_errors });
    }

    let widget = WidgetRepo::update(&state.pool, id, &input).await?;

    tracing::info!(widget_id = id, "Widget updated");

    Ok(Json(widget))
}

/// DELETE /widgets/{id}
pub async fn delete_widget(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;

    WidgetRepo::delete(&state.pool, id).await?;

    tracing::info!(widget_id = id, "Widget deleted");

    Ok(StatusCode::NO_CONTENT)
}

//! Repository for the `widgets` table.

use serde::Serialize;
use sqlx::PgPool;
use widgets_core::pagination::{clamp_page, clamp_size, page_count};
use widgets_core::types::DbId;
use widgets_core::widget::normalize_order_by;

use crate::models::widget::{CreateWidget, UpdateWidget, Widget};

/// Column list for widgets queries.
const COLUMNS: &str = "id, name, number_of_parts, created_at, updated_at";

/// Typed failures for widget persistence operations.
///
/// The variants let the HTTP boundary pick a status code without
/// inspecting message text: `NotFound` is the caller's problem, the
/// rest wrap the underlying storage failure per operation.
#[derive(Debug, thiserror::Error)]
pub enum WidgetRepoError {
    #[error("Widget with ID {id} not found")]
    NotFound { id: DbId },

    #[error("Database error creating widget: {0}")]
    Create(#[source] sqlx::Error),

    #[error("Database error updating widget: {0}")]
    Update(#[source] sqlx::Error),

    #[error("Database error deleting widget: {0}")]
    Delete(#[source] sqlx::Error),

    #[error("Database error querying widgets: {0}")]
    Query(#[source] sqlx::Error),
}

/// One page of an ordered widget listing.
#[derive(Debug, Serialize)]
pub struct WidgetPage {
    pub widgets: Vec<Widget>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
    pub pages: i64,
}

/// Whether a storage error is a Postgres unique-constraint violation
/// (SQLSTATE 23505).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

/// Provides CRUD, pagination, and search over widgets.
pub struct WidgetRepo;

impl WidgetRepo {
    /// Insert a new widget, returning the created row with its
    /// server-assigned id and timestamps.
    ///
    /// Runs in an explicit transaction; any failure drops the
    /// transaction, which rolls it back.
    pub async fn create(pool: &PgPool, input: &CreateWidget) -> Result<Widget, WidgetRepoError> {
        let mut tx = pool.begin().await.map_err(WidgetRepoError::Create)?;

        let query = format!(
            "INSERT INTO widgets (name, number_of_parts) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        let widget = sqlx::query_as::<_, Widget>(&query)
            .bind(&input.name)
            .bind(input.number_of_parts)
            .fetch_one(&mut *tx)
            .await
            .map_err(WidgetRepoError::Create)?;

        tx.commit().await.map_err(WidgetRepoError::Create)?;

        tracing::info!(widget_id = widget.id, "Created widget");
        Ok(widget)
    }

    /// Fetch a widget by its primary key.
    pub async fn get_by_id(pool: &PgPool, id: DbId) -> Result<Widget, WidgetRepoError> {
        let query = format!("SELECT {COLUMNS} FROM widgets WHERE id = $1");
        let widget = sqlx::query_as::<_, Widget>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(WidgetRepoError::Query)?;

        widget.ok_or(WidgetRepoError::NotFound { id })
    }

    /// List widgets with pagination and ordering.
    ///
    /// Out-of-range `page`/`size` are clamped and `order_by` falls back
    /// to `id` when not in the allow-list; the strict rejection of bad
    /// values happens at the API boundary, not here. Issues one count
    /// query and one ordered select; read-only, no transaction.
    pub async fn list(
        pool: &PgPool,
        page: i64,
        size: i64,
        order_by: &str,
        order_desc: bool,
    ) -> Result<WidgetPage, WidgetRepoError> {
        let page = clamp_page(page);
        let size = clamp_size(size);
        let offset = (page - 1) * size;

        // The order column comes from the allow-list, never from the
        // caller's string, so it is safe to splice into the query.
        let order_column = normalize_order_by(order_by);
        let direction = if order_desc { "DESC" } else { "ASC" };

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM widgets")
            .fetch_one(pool)
            .await
            .map_err(WidgetRepoError::Query)?;

        let query = format!(
            "SELECT {COLUMNS} FROM widgets \
             ORDER BY {order_column} {direction} \
             LIMIT $1 OFFSET $2"
        );
        let widgets = sqlx::query_as::<_, Widget>(&query)
            .bind(size)
            .bind(offset)
            .fetch_all(pool)
            .await
            .map_err(WidgetRepoError::Query)?;

        tracing::debug!(
            count = widgets.len(),
            total,
            page,
            size,
            "Retrieved widget page"
        );

        Ok(WidgetPage {
            widgets,
            total,
            page,
            size,
            pages: page_count(total, size),
        })
    }

    /// Apply a partial update to an existing widget.
    ///
    /// Fetches the row first so a missing id surfaces as `NotFound`
    /// before any write. An update with no fields set returns the
    /// current row without touching the database again; otherwise only
    /// the provided fields change and `updated_at` is refreshed.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWidget,
    ) -> Result<Widget, WidgetRepoError> {
        let current = Self::get_by_id(pool, id).await?;

        if input.is_empty() {
            return Ok(current);
        }

        let mut tx = pool.begin().await.map_err(WidgetRepoError::Update)?;

        let query = format!(
            "UPDATE widgets SET \
                name            = COALESCE($1, name), \
                number_of_parts = COALESCE($2, number_of_parts), \
                updated_at      = now() \
             WHERE id = $3 \
             RETURNING {COLUMNS}"
        );
        let widget = sqlx::query_as::<_, Widget>(&query)
            .bind(&input.name)
            .bind(input.number_of_parts)
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(WidgetRepoError::Update)?;

        tx.commit().await.map_err(WidgetRepoError::Update)?;

        tracing::info!(widget_id = id, "Updated widget");
        Ok(widget)
    }

    /// Delete a widget by its id.
    ///
    /// Verifies existence first; a delete that then affects zero rows
    /// (the row vanished in between) still surfaces as `NotFound`
    /// rather than a silent no-op.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<(), WidgetRepoError> {
        Self::get_by_id(pool, id).await?;

        let mut tx = pool.begin().await.map_err(WidgetRepoError::Delete)?;

        let result = sqlx::query("DELETE FROM widgets WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(WidgetRepoError::Delete)?;

        if result.rows_affected() == 0 {
            return Err(WidgetRepoError::NotFound { id });
        }

        tx.commit().await.map_err(WidgetRepoError::Delete)?;

        tracing::info!(widget_id = id, "Deleted widget");
        Ok(())
    }

    /// Whether a widget with the given id exists.
    ///
    /// A liveness probe, not a strict query: storage errors are logged
    /// and reported as `false` instead of propagating.
    pub async fn exists(pool: &PgPool, id: DbId) -> bool {
        let result: Result<i64, sqlx::Error> =
            sqlx::query_scalar("SELECT COUNT(*) FROM widgets WHERE id = $1")
                .bind(id)
                .fetch_one(pool)
                .await;

        match result {
            Ok(count) => count > 0,
            Err(err) => {
                tracing::error!(widget_id = id, error = %err, "Existence check failed");
                false
            }
        }
    }

    /// Case-insensitive substring search over widget names, ordered by
    /// name ascending.
    pub async fn find_by_name_pattern(
        pool: &PgPool,
        pattern: &str,
    ) -> Result<Vec<Widget>, WidgetRepoError> {
        let query = format!(
            "SELECT {COLUMNS} FROM widgets \
             WHERE name ILIKE $1 \
             ORDER BY name ASC"
        );
        let widgets = sqlx::query_as::<_, Widget>(&query)
            .bind(format!("%{pattern}%"))
            .fetch_all(pool)
            .await
            .map_err(WidgetRepoError::Query)?;

        tracing::debug!(count = widgets.len(), pattern, "Name pattern search");
        Ok(widgets)
    }
}

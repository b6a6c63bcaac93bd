//! Widget entity and its create / update DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use widgets_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A widgets row from the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Widget {
    pub id: DbId,
    pub name: String,
    pub number_of_parts: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for creating a new widget.
///
/// Carries the caller-supplied fields only; `id` and the timestamps are
/// assigned by the database. The API boundary validates and trims `name`
/// before this reaches the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWidget {
    pub name: String,
    pub number_of_parts: i64,
}

// ---------------------------------------------------------------------------
// Update DTO
// ---------------------------------------------------------------------------

/// Input for updating an existing widget. All fields are optional; `None`
/// means "leave unchanged". Neither column is nullable, so there is no
/// way to clear a field through an update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWidget {
    pub name: Option<String>,
    pub number_of_parts: Option<i64>,
}

impl UpdateWidget {
    /// True when the update carries no fields to change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.number_of_parts.is_none()
    }
}

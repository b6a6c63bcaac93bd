//! Widget field constraints and validation functions.
//!
//! Field-level rules shared by the API boundary and any tooling that
//! constructs widgets directly. Validation errors are plain strings so the
//! caller can collect them into a per-field error map.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a widget name in characters, measured after trimming.
pub const MAX_NAME_LENGTH: usize = 64;

/// Fields a widget listing may be ordered by.
pub const VALID_ORDER_FIELDS: &[&str] = &["id", "name", "created_at", "updated_at"];

/// Default ordering column for listings.
pub const DEFAULT_ORDER_FIELD: &str = "id";

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate a widget name and return its trimmed form.
///
/// Surrounding whitespace is never stored; the trimmed name must be
/// between 1 and [`MAX_NAME_LENGTH`] characters.
pub fn validate_name(name: &str) -> Result<String, String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty or whitespace only".to_string());
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(format!("Name cannot exceed {MAX_NAME_LENGTH} characters"));
    }
    Ok(trimmed.to_string())
}

/// Validate the part count: must be strictly positive.
pub fn validate_number_of_parts(number_of_parts: i64) -> Result<(), String> {
    if number_of_parts <= 0 {
        return Err("Number of parts must be a positive integer".to_string());
    }
    Ok(())
}

/// Resolve an ordering field against the allow-list.
///
/// Unknown fields fall back to [`DEFAULT_ORDER_FIELD`] rather than
/// erroring, so a stale client cannot break listings.
pub fn normalize_order_by(order_by: &str) -> &'static str {
    VALID_ORDER_FIELDS
        .iter()
        .find(|f| **f == order_by)
        .copied()
        .unwrap_or(DEFAULT_ORDER_FIELD)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

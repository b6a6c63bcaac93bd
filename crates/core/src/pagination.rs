//! Pagination constants and clamp helpers.
//!
//! This module lives in `core` (zero internal deps) so it can be used by
//! both the repository layer and the API boundary. The boundary rejects
//! out-of-range values outright; the repository clamps defensively so it
//! stays safe when called from other code paths.

/// First page number. Pages are 1-based.
pub const DEFAULT_PAGE: i64 = 1;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum number of items per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a page number to valid bounds. Anything below 1 becomes page 1.
pub fn clamp_page(page: i64) -> i64 {
    page.max(DEFAULT_PAGE)
}

/// Clamp a page size to valid bounds.
///
/// Non-positive sizes fall back to the default; oversized requests are
/// capped at [`MAX_PAGE_SIZE`].
pub fn clamp_size(size: i64) -> i64 {
    if size < 1 {
        DEFAULT_PAGE_SIZE
    } else {
        size.min(MAX_PAGE_SIZE)
    }
}

/// Total page count for `total` items at `size` per page.
///
/// Ceiling division; 0 when there are no items or the size is invalid.
pub fn page_count(total: i64, size: i64) -> i64 {
    if size <= 0 {
        return 0;
    }
    (total + size - 1) / size
}

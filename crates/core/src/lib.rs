//! Domain layer for the widgets service.
//!
//! Zero-internal-dependency crate holding the shared type aliases, field
//! validation rules, pagination helpers, and the API error taxonomy. Both
//! the repository layer and the HTTP layer build on this crate.

pub mod error;
pub mod pagination;
pub mod types;
pub mod widget;

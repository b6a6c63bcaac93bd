//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Repositories own the
//! transaction boundaries for mutating operations and map storage
//! failures into their typed error enum.

pub mod widget_repo;

pub use widget_repo::{is_unique_violation, WidgetPage, WidgetRepo, WidgetRepoError};

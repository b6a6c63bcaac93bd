//! Route definitions for the widget resource.
//!
//! ```text
//! POST   /               create_widget
//! GET    /               list_widgets (?page, size, order_by, order_desc)
//! GET    /search         search_widgets (?pattern)
//! GET    /{id}           get_widget
//! PUT    /{id}           update_widget
//! DELETE /{id}           delete_widget
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::widgets;
use crate::state::AppState;

/// Widget routes -- mounted at `/widgets`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(widgets::create_widget).get(widgets::list_widgets),
        )
        .route("/search", get(widgets::search_widgets))
        .route(
            "/{id}",
            get(widgets::get_widget)
                .put(widgets::update_widget)
                .delete(widgets::delete_widget),
        )
}

//! Route definitions for the `/admin/testimonials` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::testimonials;
use crate::state::AppState;

/// Routes mounted at `/admin/testimonials`.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create
/// PUT    /order     -> reorder
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(testimonials::list).post(testimonials::create))
        .route("/order", put(testimonials::reorder))
        .route(
            "/{id}",
            get(testimonials::get_by_id)
                .put(testimonials::update)
                .delete(testimonials::delete),
        )
}

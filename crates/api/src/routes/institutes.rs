//! Route definitions for the `/admin/institutes` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::institutes;
use crate::state::AppState;

/// Routes mounted at `/admin/institutes`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// PUT    /order          -> reorder
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete
/// POST   /{id}/cover     -> upload_cover
/// DELETE /{id}/cover     -> delete_cover
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(institutes::list).post(institutes::create))
        .route("/order", put(institutes::reorder))
        .route(
            "/{id}",
            get(institutes::get_by_id)
                .put(institutes::update)
                .delete(institutes::delete),
        )
        .route(
            "/{id}/cover",
            post(institutes::upload_cover).delete(institutes::delete_cover),
        )
}

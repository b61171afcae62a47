//! Route definitions for the `/admin/doctors` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::doctors;
use crate::state::AppState;

/// Routes mounted at `/admin/doctors`.
///
/// ```text
/// GET    /                   -> list
/// POST   /                   -> create
/// PUT    /order              -> reorder
/// GET    /{id}               -> get_by_id
/// PUT    /{id}               -> update
/// DELETE /{id}               -> delete
/// PUT    /{id}/institutes    -> set_institutes
/// POST   /{id}/photo         -> upload_photo
/// DELETE /{id}/photo         -> delete_photo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(doctors::list).post(doctors::create))
        .route("/order", put(doctors::reorder))
        .route(
            "/{id}",
            get(doctors::get_by_id)
                .put(doctors::update)
                .delete(doctors::delete),
        )
        .route("/{id}/institutes", put(doctors::set_institutes))
        .route(
            "/{id}/photo",
            post(doctors::upload_photo).delete(doctors::delete_photo),
        )
}

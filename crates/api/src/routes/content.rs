//! Route definitions for site content.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::content;
use crate::state::AppState;

/// Public routes mounted at `/content`.
///
/// ```text
/// GET /        -> get_all
/// GET /{key}   -> get_by_key
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(content::get_all))
        .route("/{key}", get(content::get_by_key))
}

/// Admin routes mounted at `/admin/content`.
///
/// ```text
/// GET    /        -> list_entries
/// PUT    /        -> put_many
/// PUT    /{key}   -> put_one
/// DELETE /{key}   -> delete_one
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(content::list_entries).put(content::put_many))
        .route("/{key}", put(content::put_one).delete(content::delete_one))
}

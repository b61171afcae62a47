//! Route definitions for raw bucket uploads.

use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;

/// Routes mounted at `/admin/uploads`.
///
/// ```text
/// POST   /{bucket}           -> upload
/// DELETE /{bucket}/{path}   -> delete_upload
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{bucket}", post(uploads::upload))
        .route("/{bucket}/{path}", delete(uploads::delete_upload))
}

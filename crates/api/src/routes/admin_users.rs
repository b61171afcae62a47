//! Route definitions for admin user management.

use axum::routing::post;
use axum::Router;

use crate::handlers::admin_users;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST /users  -> manage_users ({ "action": "list" | "create" | "delete" })
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/users", post(admin_users::manage_users))
}

//! Route definitions for the public page models.

use axum::routing::get;
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// Routes mounted at `/pages`.
///
/// ```text
/// GET /home                 -> home
/// GET /institutes           -> institutes
/// GET /institutes/{slug}    -> institute
/// GET /doctors              -> doctors
/// GET /doctors/{slug}       -> doctor
/// GET /contact              -> contact
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/home", get(pages::home))
        .route("/institutes", get(pages::institutes))
        .route("/institutes/{slug}", get(pages::institute))
        .route("/doctors", get(pages::doctors))
        .route("/doctors/{slug}", get(pages::doctor))
        .route("/contact", get(pages::contact))
}

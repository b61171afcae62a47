//! Route definitions for the JSON list editors.

use axum::routing::{get, post, put};
use axum::Router;
use clinica_core::site_content::{ContentList, ConvenioEntry, ExamEntry, FaqEntry, GallerySpace};

use crate::handlers::lists;
use crate::state::AppState;

/// Routes for one list, instantiated for its record type.
///
/// ```text
/// GET    /                -> get_items
/// PUT    /                -> replace_items
/// POST   /items           -> append_item
/// PUT    /items/{index}   -> update_item
/// DELETE /items/{index}   -> remove_item
/// POST   /move            -> move_item
/// ```
fn list_router<T: ContentList>() -> Router<AppState> {
    Router::new()
        .route("/", get(lists::get_items::<T>).put(lists::replace_items::<T>))
        .route("/items", post(lists::append_item::<T>))
        .route(
            "/items/{index}",
            put(lists::update_item::<T>).delete(lists::remove_item::<T>),
        )
        .route("/move", post(lists::move_item::<T>))
}

/// Routes mounted at `/admin/lists`.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/faq", list_router::<FaqEntry>())
        .nest("/gallery-spaces", list_router::<GallerySpace>())
        .nest("/exams", list_router::<ExamEntry>())
        .nest("/convenios", list_router::<ConvenioEntry>())
}

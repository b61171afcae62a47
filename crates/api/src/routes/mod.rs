pub mod admin_users;
pub mod auth;
pub mod content;
pub mod doctors;
pub mod health;
pub mod institutes;
pub mod lists;
pub mod pages;
pub mod testimonials;
pub mod uploads;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                  login (public)
/// /auth/refresh                                refresh (public)
/// /auth/logout                                 logout (requires auth)
/// /auth/session                                current user + is_admin
///
/// /content                                     full key/value map (public)
/// /content/{key}                               single entry (public)
///
/// /pages/home                                  home page model
/// /pages/institutes                            institute list
/// /pages/institutes/{slug}                     institute + doctors + exams
/// /pages/doctors                               doctor list
/// /pages/doctors/{slug}                        doctor + institutes
/// /pages/contact                               contact texts + units
///
/// /admin/users                                 user management (POST, action)
///
/// /admin/content                               list, batch upsert
/// /admin/content/{key}                         upsert, delete
///
/// /admin/lists/{list}                          get, replace
/// /admin/lists/{list}/items                    append (POST)
/// /admin/lists/{list}/items/{index}            update, remove
/// /admin/lists/{list}/move                     move (POST)
///
/// /admin/doctors                               list, create
/// /admin/doctors/order                         reorder (PUT)
/// /admin/doctors/{id}                          get, update, delete
/// /admin/doctors/{id}/institutes               replace links (PUT)
/// /admin/doctors/{id}/photo                    upload, remove
///
/// /admin/institutes                            list, create
/// /admin/institutes/order                      reorder (PUT)
/// /admin/institutes/{id}                       get, update, delete
/// /admin/institutes/{id}/cover                 upload, remove
///
/// /admin/testimonials                          list, create
/// /admin/testimonials/order                    reorder (PUT)
/// /admin/testimonials/{id}                     get, update, delete
///
/// /admin/uploads/{bucket}                      upload (multipart)
/// /admin/uploads/{bucket}/{path}              delete
/// ```
///
/// Every `/admin` route requires the `admin` role, enforced by the
/// `RequireAdmin` extractor in each handler.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        // Public read side.
        .nest("/content", content::public_router())
        .nest("/pages", pages::router())
        // Admin panel.
        .nest("/admin", admin_users::router())
        .nest("/admin/content", content::admin_router())
        .nest("/admin/lists", lists::router())
        .nest("/admin/doctors", doctors::router())
        .nest("/admin/institutes", institutes::router())
        .nest("/admin/testimonials", testimonials::router())
        .nest("/admin/uploads", uploads::router())
}

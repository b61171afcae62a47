//! Role-based access control for the admin subtree.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use clinica_core::error::CoreError;
use clinica_core::roles::ROLE_ADMIN;
use clinica_core::types::DbId;
use clinica_db::repositories::RoleRepo;
use clinica_db::DbPool;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires an authenticated user holding the `admin` role.
///
/// Missing or invalid tokens reject with 401; authenticated users without
/// the role reject with 403.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_admin(&state.pool, user.user_id).await {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Ask `has_role` whether `user_id` is an admin.
///
/// A failing check counts as "not admin"; the failure is logged so it can
/// be told apart from a genuine denial.
pub async fn is_admin(pool: &DbPool, user_id: DbId) -> bool {
    match RoleRepo::has_role(pool, user_id, ROLE_ADMIN).await {
        Ok(granted) => granted,
        Err(e) => {
            tracing::warn!(user_id, error = %e, "Role check failed, denying admin access");
            false
        }
    }
}

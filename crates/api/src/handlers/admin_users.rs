//! The `POST /admin/users` user-management function.
//!
//! A single endpoint dispatching on `action`:
//!
//! | action   | fields                                   | result                |
//! |----------|------------------------------------------|-----------------------|
//! | `list`   | --                                       | admin users           |
//! | `create` | `email`, `password`, `display_name`?     | 201, user (admin)     |
//! | `delete` | `user_id`                                | deleted user id       |
//!
//! The admin gate runs before the body is parsed, so a missing token is
//! always 401 and a non-admin caller always 403, whatever the payload.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use clinica_core::error::CoreError;
use clinica_core::roles::ROLE_ADMIN;
use clinica_core::types::DbId;
use clinica_core::validation::validate_email;
use clinica_db::models::user::{CreateUser, UserResponse};
use clinica_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /admin/users`. Field requirements depend on `action`.
#[derive(Debug, Deserialize)]
pub struct UserAdminRequest {
    pub action: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
    pub user_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct DeletedUser {
    pub user_id: DbId,
}

fn missing(field: &str) -> AppError {
    AppError::BadRequest(format!("Missing required field: {field}"))
}

/// POST /api/v1/admin/users
pub async fn manage_users(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    payload: Result<Json<UserAdminRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(input) =
        payload.map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))?;

    let action = input.action.as_deref().ok_or_else(|| missing("action"))?;
    match action {
        "list" => {
            let users = UserRepo::list_by_role(&state.pool, ROLE_ADMIN).await?;
            let data: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
            Ok(Json(DataResponse { data }).into_response())
        }
        "create" => {
            let user = create_admin(&state, input).await?;
            tracing::info!(admin_id = admin.user_id, user_id = user.id, "Admin user created");
            Ok((StatusCode::CREATED, Json(DataResponse { data: user })).into_response())
        }
        "delete" => {
            let user_id = input.user_id.ok_or_else(|| missing("user_id"))?;
            if user_id == admin.user_id {
                return Err(AppError::BadRequest(
                    "You cannot delete your own account".into(),
                ));
            }
            if !UserRepo::delete(&state.pool, user_id).await? {
                return Err(AppError::Core(CoreError::NotFound {
                    entity: "User",
                    id: user_id,
                }));
            }
            tracing::info!(admin_id = admin.user_id, user_id, "User deleted");
            Ok(Json(DataResponse {
                data: DeletedUser { user_id },
            })
            .into_response())
        }
        other => Err(AppError::BadRequest(format!("Unknown action '{other}'"))),
    }
}

/// Create a user and grant it the admin role.
async fn create_admin(state: &AppState, input: UserAdminRequest) -> AppResult<UserResponse> {
    let email = input
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| missing("email"))?;
    let password = input
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| missing("password"))?;

    validate_email(&email)?;
    validate_password_strength(&password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A user with email '{email}' already exists"
        ))));
    }

    let password_hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let new_user = CreateUser {
        email,
        display_name: input.display_name.filter(|n| !n.trim().is_empty()),
        password_hash,
    };
    let user = UserRepo::create_with_role(&state.pool, &new_user, ROLE_ADMIN)
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!("Role '{ROLE_ADMIN}' is missing; user not created"))
        })?;

    Ok(UserResponse::from(&user))
}

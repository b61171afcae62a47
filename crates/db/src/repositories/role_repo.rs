//! The role check behind the admin gate.
//!
//! Roles are seeded by migration and granted when an admin account is
//! created ([`UserRepo::create_with_role`](super::UserRepo::create_with_role)).

use clinica_core::types::DbId;
use sqlx::PgPool;

pub struct RoleRepo;

impl RoleRepo {
    /// Whether an active user holds the named role, via the `has_role` procedure.
    pub async fn has_role(
        pool: &PgPool,
        user_id: DbId,
        role_name: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT has_role($1, $2)")
            .bind(user_id)
            .bind(role_name)
            .fetch_one(pool)
            .await
    }
}

//! Refresh-token sessions backing the admin login.
//!
//! A session is live while it is neither revoked nor past `expires_at`.
//! Only the SHA-256 digest of a refresh token is ever stored here.

use clinica_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::session::{CreateSession, UserSession};

const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, is_revoked, \
                        user_agent, ip_address, created_at, updated_at";

/// Predicate selecting live sessions.
const LIVE: &str = "is_revoked = false AND expires_at > NOW()";

pub struct SessionRepo;

impl SessionRepo {
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at, user_agent, ip_address) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .bind(&input.user_agent)
            .bind(&input.ip_address)
            .fetch_one(pool)
            .await
    }

    /// Revoke the live session holding `hash` and return it.
    ///
    /// The lookup and the revoke are one `UPDATE`, so a refresh token can be
    /// exchanged at most once even when two requests race with it.
    pub async fn consume_active_by_hash(
        pool: &PgPool,
        hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "UPDATE user_sessions SET is_revoked = true \
             WHERE refresh_token_hash = $1 AND {LIVE} \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(hash)
            .fetch_optional(pool)
            .await
    }

    /// Sign a user out everywhere. Returns how many sessions were still open.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let done = sqlx::query(
            "UPDATE user_sessions SET is_revoked = true WHERE user_id = $1 AND is_revoked = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(done.rows_affected())
    }

    /// Delete expired sessions, and revoked ones last touched before `cutoff`.
    pub async fn purge_stale(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let done = sqlx::query(
            "DELETE FROM user_sessions \
             WHERE expires_at < NOW() OR (is_revoked AND updated_at < $1)",
        )
        .bind(cutoff)
        .execute(pool)
        .await?;
        Ok(done.rows_affected())
    }
}

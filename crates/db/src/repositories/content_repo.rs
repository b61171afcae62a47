//! Repository for the `site_content` table.

use clinica_core::content::ContentMap;
use sqlx::PgPool;

use crate::models::content::{ContentEntry, UpsertContent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, key, value, created_at, updated_at";

/// Provides key/value access to site content.
pub struct ContentRepo;

impl ContentRepo {
    /// List every entry ordered by key.
    pub async fn list(pool: &PgPool) -> Result<Vec<ContentEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM site_content ORDER BY key");
        sqlx::query_as::<_, ContentEntry>(&query)
            .fetch_all(pool)
            .await
    }

    /// Load the whole table as a key/value snapshot.
    pub async fn load_map(pool: &PgPool) -> Result<ContentMap, sqlx::Error> {
        let rows = sqlx::query_as::<_, (String, String)>("SELECT key, value FROM site_content")
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().collect())
    }

    /// Find an entry by key.
    pub async fn find_by_key(
        pool: &PgPool,
        key: &str,
    ) -> Result<Option<ContentEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM site_content WHERE key = $1");
        sqlx::query_as::<_, ContentEntry>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Insert a key or replace its value, returning the stored row.
    pub async fn upsert(pool: &PgPool, key: &str, value: &str) -> Result<ContentEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO site_content (key, value) VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentEntry>(&query)
            .bind(key)
            .bind(value)
            .fetch_one(pool)
            .await
    }

    /// Upsert several entries in one transaction. Returns the number written.
    pub async fn upsert_many(pool: &PgPool, entries: &[UpsertContent]) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut written = 0;
        for entry in entries {
            let result = sqlx::query(
                "INSERT INTO site_content (key, value) VALUES ($1, $2) \
                 ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
            )
            .bind(&entry.key)
            .bind(&entry.value)
            .execute(&mut *tx)
            .await?;
            written += result.rows_affected();
        }
        tx.commit().await?;
        Ok(written)
    }

    /// Delete an entry. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM site_content WHERE key = $1")
            .bind(key)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Repository for the `institutes` table.

use clinica_core::types::DbId;
use sqlx::PgPool;

use super::ordering;
use crate::models::institute::{CreateInstitute, Institute, UpdateInstitute};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug, category, description, icon, services, \
                       cover_image_url, display_order, created_at, updated_at";

/// Provides CRUD operations for institutes.
pub struct InstituteRepo;

impl InstituteRepo {
    /// Insert a new institute, returning the created row.
    ///
    /// `input.slug` must already be resolved. Without an explicit
    /// `display_order` the institute is appended after the last one.
    pub async fn create(pool: &PgPool, input: &CreateInstitute) -> Result<Institute, sqlx::Error> {
        let query = format!(
            "INSERT INTO institutes (name, slug, category, description, icon, services, display_order) \
             VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, ''), COALESCE($5, 'stethoscope'), $6, \
                     COALESCE($7, (SELECT COALESCE(MAX(display_order) + 1, 0) FROM institutes))) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Institute>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.category)
            .bind(&input.description)
            .bind(&input.icon)
            .bind(&input.services)
            .bind(input.display_order)
            .fetch_one(pool)
            .await
    }

    /// Find an institute by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Institute>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM institutes WHERE id = $1");
        sqlx::query_as::<_, Institute>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an institute by slug.
    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Institute>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM institutes WHERE slug = $1");
        sqlx::query_as::<_, Institute>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List all institutes ordered by display order, then name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Institute>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM institutes ORDER BY display_order, name");
        sqlx::query_as::<_, Institute>(&query).fetch_all(pool).await
    }

    /// Update an institute. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateInstitute,
    ) -> Result<Option<Institute>, sqlx::Error> {
        let query = format!(
            "UPDATE institutes SET \
                name = COALESCE($2, name), \
                slug = COALESCE($3, slug), \
                category = COALESCE($4, category), \
                description = COALESCE($5, description), \
                icon = COALESCE($6, icon), \
                services = COALESCE($7, services), \
                display_order = COALESCE($8, display_order) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Institute>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.category)
            .bind(&input.description)
            .bind(&input.icon)
            .bind(&input.services)
            .bind(input.display_order)
            .fetch_optional(pool)
            .await
    }

    /// Set or clear the cover image URL.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_cover_image_url(
        pool: &PgPool,
        id: DbId,
        cover_image_url: Option<&str>,
    ) -> Result<Option<Institute>, sqlx::Error> {
        let query =
            format!("UPDATE institutes SET cover_image_url = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Institute>(&query)
            .bind(id)
            .bind(cover_image_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete an institute (doctor links cascade). Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM institutes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every institute id, in display order.
    pub async fn list_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        ordering::list_ids(pool, "institutes").await
    }

    /// Rewrite `display_order` to match the position of each id in `ids`.
    pub async fn reorder(pool: &PgPool, ids: &[DbId]) -> Result<(), sqlx::Error> {
        ordering::apply_display_order(pool, "institutes", ids).await
    }
}

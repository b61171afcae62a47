//! Repository for the `testimonials` table.

use clinica_core::types::DbId;
use sqlx::PgPool;

use super::ordering;
use crate::models::testimonial::{CreateTestimonial, Testimonial, UpdateTestimonial};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, quote, patient_initials, specialty, rating, is_published, \
                       display_order, created_at, updated_at";

/// Provides CRUD operations for testimonials.
pub struct TestimonialRepo;

impl TestimonialRepo {
    /// Insert a new testimonial, returning the created row.
    ///
    /// Defaults: 5 stars, unpublished, appended after the last testimonial.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTestimonial,
    ) -> Result<Testimonial, sqlx::Error> {
        let query = format!(
            "INSERT INTO testimonials (quote, patient_initials, specialty, rating, is_published, display_order) \
             VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, 5), COALESCE($5, false), \
                     COALESCE($6, (SELECT COALESCE(MAX(display_order) + 1, 0) FROM testimonials))) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(&input.quote)
            .bind(&input.patient_initials)
            .bind(&input.specialty)
            .bind(input.rating)
            .bind(input.is_published)
            .bind(input.display_order)
            .fetch_one(pool)
            .await
    }

    /// Find a testimonial by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Testimonial>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM testimonials WHERE id = $1");
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List testimonials in display order, optionally including unpublished ones.
    pub async fn list(
        pool: &PgPool,
        include_unpublished: bool,
    ) -> Result<Vec<Testimonial>, sqlx::Error> {
        let query = if include_unpublished {
            format!("SELECT {COLUMNS} FROM testimonials ORDER BY display_order, id")
        } else {
            format!(
                "SELECT {COLUMNS} FROM testimonials WHERE is_published = true \
                 ORDER BY display_order, id"
            )
        };
        sqlx::query_as::<_, Testimonial>(&query).fetch_all(pool).await
    }

    /// Update a testimonial. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTestimonial,
    ) -> Result<Option<Testimonial>, sqlx::Error> {
        let query = format!(
            "UPDATE testimonials SET \
                quote = COALESCE($2, quote), \
                patient_initials = COALESCE($3, patient_initials), \
                specialty = COALESCE($4, specialty), \
                rating = COALESCE($5, rating), \
                is_published = COALESCE($6, is_published), \
                display_order = COALESCE($7, display_order) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(id)
            .bind(&input.quote)
            .bind(&input.patient_initials)
            .bind(&input.specialty)
            .bind(input.rating)
            .bind(input.is_published)
            .bind(input.display_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete a testimonial. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every testimonial id, in display order.
    pub async fn list_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        ordering::list_ids(pool, "testimonials").await
    }

    /// Rewrite `display_order` to match the position of each id in `ids`.
    pub async fn reorder(pool: &PgPool, ids: &[DbId]) -> Result<(), sqlx::Error> {
        ordering::apply_display_order(pool, "testimonials", ids).await
    }
}

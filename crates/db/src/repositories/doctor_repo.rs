//! Repository for the `doctors` table and its `doctor_institutes` links.

use std::collections::HashMap;

use clinica_core::types::DbId;
use sqlx::{FromRow, PgPool};

use super::ordering;
use crate::models::doctor::{CreateDoctor, Doctor, DoctorSummary, DoctorWithInstitutes, UpdateDoctor};
use crate::models::institute::InstituteSummary;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, specialty, crm, bio, photo_url, slug, display_order, \
                       created_at, updated_at";

/// Institute columns as seen through the link table.
const INSTITUTE_SUMMARY_COLUMNS: &str = "i.id, i.name, i.slug, i.icon";

/// A doctor/institute link joined with the institute summary.
#[derive(Debug, FromRow)]
struct InstituteLink {
    doctor_id: DbId,
    #[sqlx(flatten)]
    institute: InstituteSummary,
}

/// Provides CRUD operations for doctors.
pub struct DoctorRepo;

impl DoctorRepo {
    /// Insert a new doctor with its institute links, returning the created row.
    ///
    /// `input.slug` must already be resolved. Without an explicit
    /// `display_order` the doctor is appended after the last one.
    pub async fn create(pool: &PgPool, input: &CreateDoctor) -> Result<Doctor, sqlx::Error> {
        let query = format!(
            "INSERT INTO doctors (name, specialty, crm, bio, slug, display_order) \
             VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, ''), $5, \
                     COALESCE($6, (SELECT COALESCE(MAX(display_order) + 1, 0) FROM doctors))) \
             RETURNING {COLUMNS}"
        );
        let mut tx = pool.begin().await?;
        let doctor = sqlx::query_as::<_, Doctor>(&query)
            .bind(&input.name)
            .bind(&input.specialty)
            .bind(&input.crm)
            .bind(&input.bio)
            .bind(&input.slug)
            .bind(input.display_order)
            .fetch_one(&mut *tx)
            .await?;
        for institute_id in &input.institute_ids {
            sqlx::query(
                "INSERT INTO doctor_institutes (doctor_id, institute_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(doctor.id)
            .bind(institute_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(doctor)
    }

    /// Find a doctor by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Doctor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM doctors WHERE id = $1");
        sqlx::query_as::<_, Doctor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a doctor by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Doctor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM doctors WHERE slug = $1");
        sqlx::query_as::<_, Doctor>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List all doctors ordered by display order, then name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Doctor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM doctors ORDER BY display_order, name");
        sqlx::query_as::<_, Doctor>(&query).fetch_all(pool).await
    }

    /// List all doctors with their institutes, using two queries.
    pub async fn list_with_institutes(
        pool: &PgPool,
    ) -> Result<Vec<DoctorWithInstitutes>, sqlx::Error> {
        let doctors = Self::list(pool).await?;

        let query = format!(
            "SELECT di.doctor_id, {INSTITUTE_SUMMARY_COLUMNS} \
             FROM doctor_institutes di \
             JOIN institutes i ON i.id = di.institute_id \
             ORDER BY i.display_order, i.name"
        );
        let links = sqlx::query_as::<_, InstituteLink>(&query)
            .fetch_all(pool)
            .await?;

        let mut by_doctor: HashMap<DbId, Vec<InstituteSummary>> = HashMap::new();
        for link in links {
            by_doctor
                .entry(link.doctor_id)
                .or_default()
                .push(link.institute);
        }

        Ok(doctors
            .into_iter()
            .map(|doctor| {
                let institutes = by_doctor.remove(&doctor.id).unwrap_or_default();
                DoctorWithInstitutes { doctor, institutes }
            })
            .collect())
    }

    /// Institutes linked to a doctor, in institute display order.
    pub async fn list_institutes(
        pool: &PgPool,
        doctor_id: DbId,
    ) -> Result<Vec<InstituteSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {INSTITUTE_SUMMARY_COLUMNS} \
             FROM doctor_institutes di \
             JOIN institutes i ON i.id = di.institute_id \
             WHERE di.doctor_id = $1 \
             ORDER BY i.display_order, i.name"
        );
        sqlx::query_as::<_, InstituteSummary>(&query)
            .bind(doctor_id)
            .fetch_all(pool)
            .await
    }

    /// Doctors linked to an institute, in doctor display order.
    pub async fn list_by_institute(
        pool: &PgPool,
        institute_id: DbId,
    ) -> Result<Vec<DoctorSummary>, sqlx::Error> {
        sqlx::query_as::<_, DoctorSummary>(
            "SELECT d.id, d.name, d.specialty, d.photo_url, d.slug \
             FROM doctor_institutes di \
             JOIN doctors d ON d.id = di.doctor_id \
             WHERE di.institute_id = $1 \
             ORDER BY d.display_order, d.name",
        )
        .bind(institute_id)
        .fetch_all(pool)
        .await
    }

    /// Replace the full set of institutes linked to a doctor.
    pub async fn set_institutes(
        pool: &PgPool,
        doctor_id: DbId,
        institute_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM doctor_institutes WHERE doctor_id = $1")
            .bind(doctor_id)
            .execute(&mut *tx)
            .await?;
        for institute_id in institute_ids {
            sqlx::query(
                "INSERT INTO doctor_institutes (doctor_id, institute_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(doctor_id)
            .bind(institute_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await
    }

    /// Update a doctor. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDoctor,
    ) -> Result<Option<Doctor>, sqlx::Error> {
        let query = format!(
            "UPDATE doctors SET \
                name = COALESCE($2, name), \
                specialty = COALESCE($3, specialty), \
                crm = COALESCE($4, crm), \
                bio = COALESCE($5, bio), \
                slug = COALESCE($6, slug), \
                display_order = COALESCE($7, display_order) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Doctor>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.specialty)
            .bind(&input.crm)
            .bind(&input.bio)
            .bind(&input.slug)
            .bind(input.display_order)
            .fetch_optional(pool)
            .await
    }

    /// Set or clear the photo URL.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_photo_url(
        pool: &PgPool,
        id: DbId,
        photo_url: Option<&str>,
    ) -> Result<Option<Doctor>, sqlx::Error> {
        let query = format!("UPDATE doctors SET photo_url = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Doctor>(&query)
            .bind(id)
            .bind(photo_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a doctor (links cascade). Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM doctors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every doctor id, in display order.
    pub async fn list_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        ordering::list_ids(pool, "doctors").await
    }

    /// Rewrite `display_order` to match the position of each id in `ids`.
    pub async fn reorder(pool: &PgPool, ids: &[DbId]) -> Result<(), sqlx::Error> {
        ordering::apply_display_order(pool, "doctors", ids).await
    }
}

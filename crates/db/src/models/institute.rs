//! Institute entity model and DTOs.

use clinica_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::doctor::DoctorSummary;

/// A row from the `institutes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Institute {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub description: String,
    /// Icon identifier understood by the front end (e.g. `"heart-pulse"`).
    pub icon: String,
    pub services: Vec<String>,
    pub cover_image_url: Option<String>,
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Minimal institute projection embedded in doctor pages.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InstituteSummary {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub icon: String,
}

/// An institute together with the doctors working in it.
#[derive(Debug, Clone, Serialize)]
pub struct InstituteWithDoctors {
    #[serde(flatten)]
    pub institute: Institute,
    pub doctors: Vec<DoctorSummary>,
}

/// DTO for creating a new institute.
///
/// `slug` is derived from `name` by the API layer when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInstitute {
    pub name: String,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
    pub display_order: Option<i32>,
}

/// DTO for updating an existing institute. All fields are optional.
///
/// The cover image is managed through the upload endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInstitute {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub services: Option<Vec<String>>,
    pub display_order: Option<i32>,
}

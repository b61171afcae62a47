//! Doctor entity model and DTOs.

use clinica_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::institute::InstituteSummary;

/// A row from the `doctors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Doctor {
    pub id: DbId,
    pub name: String,
    pub specialty: String,
    /// Regional medical council registration (CRM).
    pub crm: String,
    pub bio: String,
    pub photo_url: Option<String>,
    pub slug: String,
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Minimal doctor projection embedded in institute pages.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DoctorSummary {
    pub id: DbId,
    pub name: String,
    pub specialty: String,
    pub photo_url: Option<String>,
    pub slug: String,
}

/// A doctor together with the institutes it works in.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorWithInstitutes {
    #[serde(flatten)]
    pub doctor: Doctor,
    pub institutes: Vec<InstituteSummary>,
}

/// DTO for creating a new doctor.
///
/// `slug` is derived from `name` by the API layer when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDoctor {
    pub name: String,
    pub specialty: String,
    pub crm: Option<String>,
    pub bio: Option<String>,
    pub slug: Option<String>,
    pub display_order: Option<i32>,
    #[serde(default)]
    pub institute_ids: Vec<DbId>,
}

/// DTO for updating an existing doctor. All fields are optional.
///
/// The photo is managed through the upload endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDoctor {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub crm: Option<String>,
    pub bio: Option<String>,
    pub slug: Option<String>,
    pub display_order: Option<i32>,
}

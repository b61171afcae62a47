//! Testimonial entity model and DTOs.

use clinica_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `testimonials` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Testimonial {
    pub id: DbId,
    pub quote: String,
    pub patient_initials: String,
    pub specialty: String,
    /// 1 to 5 stars.
    pub rating: i32,
    pub is_published: bool,
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new testimonial.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTestimonial {
    pub quote: String,
    pub patient_initials: String,
    pub specialty: Option<String>,
    pub rating: Option<i32>,
    pub is_published: Option<bool>,
    pub display_order: Option<i32>,
}

/// DTO for updating an existing testimonial. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTestimonial {
    pub quote: Option<String>,
    pub patient_initials: Option<String>,
    pub specialty: Option<String>,
    pub rating: Option<i32>,
    pub is_published: Option<bool>,
    pub display_order: Option<i32>,
}

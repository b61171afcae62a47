//! Site content entry model.

use clinica_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `site_content` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContentEntry {
    pub id: DbId,
    pub key: String,
    pub value: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting or replacing a content value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertContent {
    pub key: String,
    pub value: String,
}

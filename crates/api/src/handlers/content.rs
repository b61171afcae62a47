//! Handlers for site content: the public map and admin key/value edits.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use clinica_core::content::ContentMap;
use clinica_core::error::CoreError;
use clinica_core::site_content::{ContentList, ConvenioEntry, ExamEntry, FaqEntry, GallerySpace};
use clinica_core::validation::validate_content_key;
use clinica_db::models::content::{ContentEntry, UpsertContent};
use clinica_db::repositories::ContentRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /admin/content`.
#[derive(Debug, Deserialize)]
pub struct BatchContentRequest {
    pub entries: HashMap<String, String>,
}

/// Request body for `PUT /admin/content/{key}`.
#[derive(Debug, Deserialize)]
pub struct ContentValueRequest {
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct BatchContentResponse {
    pub written: u64,
}

/// Keys bound to a typed list must hold a JSON array of valid records of
/// that type, the same records the list editor accepts.
fn check_value_shape(key: &str, value: &str) -> Result<(), CoreError> {
    fn parses<T: ContentList>(value: &str) -> Result<(), CoreError> {
        let items = serde_json::from_str::<Vec<T>>(value).map_err(|e| {
            CoreError::Validation(format!("'{}' must be a list of {}: {e}", T::KEY, T::LABEL))
        })?;
        items.iter().try_for_each(T::validate)
    }

    match key {
        FaqEntry::KEY => parses::<FaqEntry>(value),
        GallerySpace::KEY => parses::<GallerySpace>(value),
        ExamEntry::KEY => parses::<ExamEntry>(value),
        ConvenioEntry::KEY => parses::<ConvenioEntry>(value),
        _ => Ok(()),
    }
}

fn check_entry(key: &str, value: &str) -> Result<(), CoreError> {
    validate_content_key(key)?;
    check_value_shape(key, value)
}

/// GET /api/v1/content
///
/// The full key/value map, served from the snapshot cache.
pub async fn get_all(State(state): State<AppState>) -> AppResult<Json<DataResponse<ContentMap>>> {
    let map = state.content.snapshot(&state.pool).await?;
    Ok(Json(DataResponse {
        data: map.as_ref().clone(),
    }))
}

/// GET /api/v1/content/{key}
pub async fn get_by_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<DataResponse<ContentEntry>>> {
    let entry = ContentRepo::find_by_key(&state.pool, &key)
        .await?
        .ok_or(AppError::Core(CoreError::ContentKeyNotFound(key)))?;
    Ok(Json(DataResponse { data: entry }))
}

/// GET /api/v1/admin/content
///
/// Every stored entry with timestamps, ordered by key.
pub async fn list_entries(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<ContentEntry>>>> {
    let entries = ContentRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// PUT /api/v1/admin/content
///
/// Upsert several keys in one transaction.
pub async fn put_many(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<BatchContentRequest>,
) -> AppResult<Json<DataResponse<BatchContentResponse>>> {
    let mut entries: Vec<UpsertContent> = input
        .entries
        .into_iter()
        .map(|(key, value)| UpsertContent { key, value })
        .collect();
    entries.sort_by(|a, b| a.key.cmp(&b.key));
    for entry in &entries {
        check_entry(&entry.key, &entry.value)?;
    }

    let written = ContentRepo::upsert_many(&state.pool, &entries).await?;
    state.content.invalidate().await;

    tracing::info!(user_id = admin.user_id, written, "Content entries saved");
    Ok(Json(DataResponse {
        data: BatchContentResponse { written },
    }))
}

/// PUT /api/v1/admin/content/{key}
pub async fn put_one(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(key): Path<String>,
    Json(input): Json<ContentValueRequest>,
) -> AppResult<Json<DataResponse<ContentEntry>>> {
    check_entry(&key, &input.value)?;

    let entry = ContentRepo::upsert(&state.pool, &key, &input.value).await?;
    state.content.invalidate().await;

    tracing::info!(user_id = admin.user_id, key = %entry.key, "Content entry saved");
    Ok(Json(DataResponse { data: entry }))
}

/// DELETE /api/v1/admin/content/{key}
///
/// Removing a key makes readers fall back to the built-in default.
pub async fn delete_one(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(key): Path<String>,
) -> AppResult<StatusCode> {
    if !ContentRepo::delete(&state.pool, &key).await? {
        return Err(AppError::Core(CoreError::ContentKeyNotFound(key)));
    }
    state.content.invalidate().await;

    tracing::info!(user_id = admin.user_id, key = %key, "Content entry deleted");
    Ok(StatusCode::NO_CONTENT)
}

//! Admin handlers for the `/admin/institutes` resource.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use clinica_core::error::CoreError;
use clinica_core::ordered_list::validate_permutation;
use clinica_core::slug::{resolve_slug, validate_slug};
use clinica_core::types::DbId;
use clinica_core::validation::{require_non_empty, require_non_empty_opt};
use clinica_db::models::institute::{
    CreateInstitute, Institute, InstituteWithDoctors, UpdateInstitute,
};
use clinica_db::repositories::{DoctorRepo, InstituteRepo};
use clinica_db::DbPool;
use clinica_storage::Bucket;

use super::uploads::{discard_url, read_image_upload, store_image};
use super::ReorderRequest;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Institute",
        id,
    })
}

async fn find_or_404(pool: &DbPool, id: DbId) -> AppResult<Institute> {
    InstituteRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Trim service names and drop the blank ones.
fn clean_services(services: Vec<String>) -> Vec<String> {
    services
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// GET /api/v1/admin/institutes
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<Institute>>>> {
    let institutes = InstituteRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: institutes }))
}

/// POST /api/v1/admin/institutes
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(mut input): Json<CreateInstitute>,
) -> AppResult<(StatusCode, Json<DataResponse<Institute>>)> {
    require_non_empty("name", &input.name)?;
    input.slug = Some(resolve_slug(input.slug.as_deref(), &input.name)?);
    input.services = clean_services(input.services);

    let institute = InstituteRepo::create(&state.pool, &input).await?;
    tracing::info!(
        user_id = admin.user_id,
        institute_id = institute.id,
        slug = %institute.slug,
        "Institute created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: institute })))
}

/// GET /api/v1/admin/institutes/{id}
///
/// Includes the doctors linked to the institute.
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<InstituteWithDoctors>>> {
    let institute = find_or_404(&state.pool, id).await?;
    let doctors = DoctorRepo::list_by_institute(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: InstituteWithDoctors { institute, doctors },
    }))
}

/// PUT /api/v1/admin/institutes/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateInstitute>,
) -> AppResult<Json<DataResponse<Institute>>> {
    require_non_empty_opt("name", input.name.as_deref())?;
    if let Some(slug) = &input.slug {
        validate_slug(slug)?;
    }
    input.services = input.services.map(clean_services);

    let institute = InstituteRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: institute }))
}

/// DELETE /api/v1/admin/institutes/{id}
///
/// Doctor links cascade; the cover image is discarded from storage.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let institute = find_or_404(&state.pool, id).await?;
    if !InstituteRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    if let Some(url) = &institute.cover_image_url {
        discard_url(&state, url).await;
    }

    tracing::info!(user_id = admin.user_id, institute_id = id, "Institute deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/admin/institutes/order
pub async fn reorder(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<ReorderRequest>,
) -> AppResult<Json<DataResponse<Vec<Institute>>>> {
    let existing = InstituteRepo::list_ids(&state.pool).await?;
    validate_permutation(&input.ids, &existing)?;
    InstituteRepo::reorder(&state.pool, &input.ids).await?;

    let institutes = InstituteRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: institutes }))
}

/// POST /api/v1/admin/institutes/{id}/cover
pub async fn upload_cover(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Institute>>> {
    let previous = find_or_404(&state.pool, id).await?;
    let upload = read_image_upload(multipart).await?;
    let stored = store_image(&state, Bucket::SiteImages, upload).await?;

    let Some(institute) =
        InstituteRepo::set_cover_image_url(&state.pool, id, Some(&stored.url)).await?
    else {
        discard_url(&state, &stored.url).await;
        return Err(not_found(id));
    };
    if let Some(old) = previous.cover_image_url.as_deref() {
        discard_url(&state, old).await;
    }

    Ok(Json(DataResponse { data: institute }))
}

/// DELETE /api/v1/admin/institutes/{id}/cover
pub async fn delete_cover(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Institute>>> {
    let previous = find_or_404(&state.pool, id).await?;
    let institute = InstituteRepo::set_cover_image_url(&state.pool, id, None)
        .await?
        .ok_or_else(|| not_found(id))?;
    if let Some(old) = previous.cover_image_url.as_deref() {
        discard_url(&state, old).await;
    }
    Ok(Json(DataResponse { data: institute }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_services_are_dropped() {
        let services = vec![
            " Ecocardiograma ".to_string(),
            "".to_string(),
            "  ".to_string(),
            "Holter".to_string(),
        ];
        assert_eq!(clean_services(services), vec!["Ecocardiograma", "Holter"]);
    }
}

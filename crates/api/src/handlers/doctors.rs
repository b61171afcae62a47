//! Admin handlers for the `/admin/doctors` resource.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use clinica_core::error::CoreError;
use clinica_core::ordered_list::validate_permutation;
use clinica_core::slug::{resolve_slug, validate_slug};
use clinica_core::types::DbId;
use clinica_core::validation::{require_non_empty, require_non_empty_opt};
use clinica_db::models::doctor::{CreateDoctor, Doctor, DoctorWithInstitutes, UpdateDoctor};
use clinica_db::repositories::DoctorRepo;
use clinica_db::DbPool;
use clinica_storage::Bucket;
use serde::Deserialize;

use super::uploads::{discard_url, read_image_upload, store_image};
use super::ReorderRequest;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /admin/doctors/{id}/institutes`.
#[derive(Debug, Deserialize)]
pub struct SetInstitutesRequest {
    pub institute_ids: Vec<DbId>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Doctor",
        id,
    })
}

async fn find_or_404(pool: &DbPool, id: DbId) -> AppResult<Doctor> {
    DoctorRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

async fn with_institutes(pool: &DbPool, doctor: Doctor) -> AppResult<DoctorWithInstitutes> {
    let institutes = DoctorRepo::list_institutes(pool, doctor.id).await?;
    Ok(DoctorWithInstitutes { doctor, institutes })
}

/// GET /api/v1/admin/doctors
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<DoctorWithInstitutes>>>> {
    let doctors = DoctorRepo::list_with_institutes(&state.pool).await?;
    Ok(Json(DataResponse { data: doctors }))
}

/// POST /api/v1/admin/doctors
///
/// The slug is derived from the name when omitted. A taken slug is 409.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(mut input): Json<CreateDoctor>,
) -> AppResult<(StatusCode, Json<DataResponse<DoctorWithInstitutes>>)> {
    require_non_empty("name", &input.name)?;
    require_non_empty("specialty", &input.specialty)?;
    input.slug = Some(resolve_slug(input.slug.as_deref(), &input.name)?);

    let doctor = DoctorRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = admin.user_id, doctor_id = doctor.id, slug = %doctor.slug, "Doctor created");

    let data = with_institutes(&state.pool, doctor).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/v1/admin/doctors/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DoctorWithInstitutes>>> {
    let doctor = find_or_404(&state.pool, id).await?;
    let data = with_institutes(&state.pool, doctor).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/admin/doctors/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDoctor>,
) -> AppResult<Json<DataResponse<DoctorWithInstitutes>>> {
    require_non_empty_opt("name", input.name.as_deref())?;
    require_non_empty_opt("specialty", input.specialty.as_deref())?;
    if let Some(slug) = &input.slug {
        validate_slug(slug)?;
    }

    let doctor = DoctorRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    let data = with_institutes(&state.pool, doctor).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/admin/doctors/{id}
///
/// Institute links cascade; the photo is discarded from storage.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let doctor = find_or_404(&state.pool, id).await?;
    if !DoctorRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    if let Some(url) = &doctor.photo_url {
        discard_url(&state, url).await;
    }

    tracing::info!(user_id = admin.user_id, doctor_id = id, "Doctor deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/admin/doctors/order
pub async fn reorder(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<ReorderRequest>,
) -> AppResult<Json<DataResponse<Vec<DoctorWithInstitutes>>>> {
    let existing = DoctorRepo::list_ids(&state.pool).await?;
    validate_permutation(&input.ids, &existing)?;
    DoctorRepo::reorder(&state.pool, &input.ids).await?;

    let doctors = DoctorRepo::list_with_institutes(&state.pool).await?;
    Ok(Json(DataResponse { data: doctors }))
}

/// PUT /api/v1/admin/doctors/{id}/institutes
///
/// Replace the doctor's institute links. Unknown institute ids are 400.
pub async fn set_institutes(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<SetInstitutesRequest>,
) -> AppResult<Json<DataResponse<DoctorWithInstitutes>>> {
    let doctor = find_or_404(&state.pool, id).await?;
    DoctorRepo::set_institutes(&state.pool, id, &input.institute_ids).await?;
    let data = with_institutes(&state.pool, doctor).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/admin/doctors/{id}/photo
///
/// Multipart upload (see [`read_image_upload`]). The previous photo is
/// discarded only after the new URL is saved.
pub async fn upload_photo(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Doctor>>> {
    let previous = find_or_404(&state.pool, id).await?;
    let upload = read_image_upload(multipart).await?;
    let stored = store_image(&state, Bucket::SiteImages, upload).await?;

    let Some(doctor) = DoctorRepo::set_photo_url(&state.pool, id, Some(&stored.url)).await? else {
        discard_url(&state, &stored.url).await;
        return Err(not_found(id));
    };
    if let Some(old) = previous.photo_url.as_deref() {
        discard_url(&state, old).await;
    }

    Ok(Json(DataResponse { data: doctor }))
}

/// DELETE /api/v1/admin/doctors/{id}/photo
pub async fn delete_photo(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Doctor>>> {
    let previous = find_or_404(&state.pool, id).await?;
    let doctor = DoctorRepo::set_photo_url(&state.pool, id, None)
        .await?
        .ok_or_else(|| not_found(id))?;
    if let Some(old) = previous.photo_url.as_deref() {
        discard_url(&state, old).await;
    }
    Ok(Json(DataResponse { data: doctor }))
}

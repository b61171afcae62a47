//! Admin handlers for the `/admin/testimonials` resource.
//!
//! The admin list includes unpublished testimonials; public pages only
//! ever see published ones.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use clinica_core::error::CoreError;
use clinica_core::ordered_list::validate_permutation;
use clinica_core::types::DbId;
use clinica_core::validation::{require_non_empty, require_non_empty_opt, validate_rating};
use clinica_db::models::testimonial::{CreateTestimonial, Testimonial, UpdateTestimonial};
use clinica_db::repositories::TestimonialRepo;

use super::ReorderRequest;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Testimonial",
        id,
    })
}

/// GET /api/v1/admin/testimonials
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<Testimonial>>>> {
    let testimonials = TestimonialRepo::list(&state.pool, true).await?;
    Ok(Json(DataResponse { data: testimonials }))
}

/// POST /api/v1/admin/testimonials
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateTestimonial>,
) -> AppResult<(StatusCode, Json<DataResponse<Testimonial>>)> {
    require_non_empty("quote", &input.quote)?;
    require_non_empty("patient_initials", &input.patient_initials)?;
    if let Some(rating) = input.rating {
        validate_rating(rating)?;
    }

    let testimonial = TestimonialRepo::create(&state.pool, &input).await?;
    tracing::info!(
        user_id = admin.user_id,
        testimonial_id = testimonial.id,
        "Testimonial created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: testimonial })))
}

/// GET /api/v1/admin/testimonials/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Testimonial>>> {
    let testimonial = TestimonialRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: testimonial }))
}

/// PUT /api/v1/admin/testimonials/{id}
///
/// Toggle publication with `{ "is_published": true }`.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTestimonial>,
) -> AppResult<Json<DataResponse<Testimonial>>> {
    require_non_empty_opt("quote", input.quote.as_deref())?;
    require_non_empty_opt("patient_initials", input.patient_initials.as_deref())?;
    if let Some(rating) = input.rating {
        validate_rating(rating)?;
    }

    let testimonial = TestimonialRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: testimonial }))
}

/// DELETE /api/v1/admin/testimonials/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !TestimonialRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(user_id = admin.user_id, testimonial_id = id, "Testimonial deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/admin/testimonials/order
pub async fn reorder(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<ReorderRequest>,
) -> AppResult<Json<DataResponse<Vec<Testimonial>>>> {
    let existing = TestimonialRepo::list_ids(&state.pool).await?;
    validate_permutation(&input.ids, &existing)?;
    TestimonialRepo::reorder(&state.pool, &input.ids).await?;

    let testimonials = TestimonialRepo::list(&state.pool, true).await?;
    Ok(Json(DataResponse { data: testimonials }))
}

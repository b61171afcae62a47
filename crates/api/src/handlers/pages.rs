//! Read-only page models for the public site.
//!
//! Each handler assembles everything one page renders: editable copy from
//! the content snapshot (falling back to built-in defaults), rows from the
//! entity tables and static mock data. Nothing here writes.

use axum::extract::{Path, State};
use axum::Json;
use clinica_core::content::ContentMap;
use clinica_core::error::CoreError;
use clinica_core::mock_data::{ClinicUnit, Highlight, HIGHLIGHTS, UNITS};
use clinica_core::site_content::{
    ConvenioEntry, ExamEntry, FaqEntry, GallerySpace, ABOUT_TEXT, CONTACT_ADDRESS,
    CONTACT_EMAIL, CONTACT_HOURS, CONTACT_PHONE, CONTACT_WHATSAPP, HERO_SUBTITLE, HERO_TITLE,
};
use clinica_db::models::doctor::DoctorWithInstitutes;
use clinica_db::models::institute::{Institute, InstituteWithDoctors};
use clinica_db::models::testimonial::Testimonial;
use clinica_db::repositories::{DoctorRepo, InstituteRepo, TestimonialRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub hero_title: String,
    pub hero_subtitle: String,
    pub about_text: String,
    pub highlights: &'static [Highlight],
    pub institutes: Vec<Institute>,
    pub testimonials: Vec<Testimonial>,
    pub faq: Vec<FaqEntry>,
    pub gallery: Vec<GallerySpace>,
    pub convenios: Vec<ConvenioEntry>,
}

#[derive(Debug, Serialize)]
pub struct InstitutePage {
    pub institute: InstituteWithDoctors,
    pub exams: Vec<ExamEntry>,
}

#[derive(Debug, Serialize)]
pub struct ContactPage {
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
    pub address: String,
    pub hours: String,
    pub units: &'static [ClinicUnit],
}

/// Exams attached to the institute with the given slug.
fn exams_for(content: &ContentMap, slug: &str) -> Vec<ExamEntry> {
    content
        .list::<ExamEntry>()
        .into_iter()
        .filter(|exam| exam.institute.as_deref() == Some(slug))
        .collect()
}

/// GET /api/v1/pages/home
pub async fn home(State(state): State<AppState>) -> AppResult<Json<DataResponse<HomePage>>> {
    let content = state.content.snapshot(&state.pool).await?;
    let institutes = InstituteRepo::list(&state.pool).await?;
    let testimonials = TestimonialRepo::list(&state.pool, false).await?;

    Ok(Json(DataResponse {
        data: HomePage {
            hero_title: content.text(&HERO_TITLE),
            hero_subtitle: content.text(&HERO_SUBTITLE),
            about_text: content.text(&ABOUT_TEXT),
            highlights: HIGHLIGHTS,
            institutes,
            testimonials,
            faq: content.list(),
            gallery: content.list(),
            convenios: content.list(),
        },
    }))
}

/// GET /api/v1/pages/institutes
pub async fn institutes(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Institute>>>> {
    let institutes = InstituteRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: institutes }))
}

/// GET /api/v1/pages/institutes/{slug}
pub async fn institute(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<InstitutePage>>> {
    let institute = InstituteRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::SlugNotFound {
                entity: "Institute",
                slug: slug.clone(),
            })
        })?;
    let doctors = DoctorRepo::list_by_institute(&state.pool, institute.id).await?;
    let content = state.content.snapshot(&state.pool).await?;

    Ok(Json(DataResponse {
        data: InstitutePage {
            exams: exams_for(&content, &institute.slug),
            institute: InstituteWithDoctors { institute, doctors },
        },
    }))
}

/// GET /api/v1/pages/doctors
pub async fn doctors(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<DoctorWithInstitutes>>>> {
    let doctors = DoctorRepo::list_with_institutes(&state.pool).await?;
    Ok(Json(DataResponse { data: doctors }))
}

/// GET /api/v1/pages/doctors/{slug}
pub async fn doctor(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<DoctorWithInstitutes>>> {
    let doctor = DoctorRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::SlugNotFound {
                entity: "Doctor",
                slug: slug.clone(),
            })
        })?;
    let institutes = DoctorRepo::list_institutes(&state.pool, doctor.id).await?;
    Ok(Json(DataResponse {
        data: DoctorWithInstitutes { doctor, institutes },
    }))
}

/// GET /api/v1/pages/contact
pub async fn contact(State(state): State<AppState>) -> AppResult<Json<DataResponse<ContactPage>>> {
    let content = state.content.snapshot(&state.pool).await?;
    Ok(Json(DataResponse {
        data: ContactPage {
            phone: content.text(&CONTACT_PHONE),
            whatsapp: content.text(&CONTACT_WHATSAPP),
            email: content.text(&CONTACT_EMAIL),
            address: content.text(&CONTACT_ADDRESS),
            hours: content.text(&CONTACT_HOURS),
            units: UNITS,
        },
    }))
}

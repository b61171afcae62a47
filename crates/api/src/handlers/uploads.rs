//! Image upload pipeline and the `/admin/uploads` resource.
//!
//! Uploads arrive as multipart forms with a `file` part and optional crop
//! fields. Site images are always re-encoded (crop, rotate, scale, JPEG);
//! convenio logos are stored as sent unless crop fields are present. Every
//! object gets a fresh random name, and replaced objects are deleted on a
//! best-effort basis.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use clinica_core::imaging::{
    crop_and_encode, passthrough, random_object_name, CropArea, CropSettings, EncodedImage,
    Rotation,
};
use clinica_storage::{validate_object_name, Bucket, StoredObject};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Multipart parsing
// ---------------------------------------------------------------------------

/// Crop fields as sent by the admin cropper. All optional.
#[derive(Debug, Default)]
pub(crate) struct CropFields {
    x: Option<u32>,
    y: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
    rotation: Option<i32>,
    aspect: Option<f64>,
    scale: Option<f64>,
}

impl CropFields {
    fn is_empty(&self) -> bool {
        self.x.is_none()
            && self.y.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.rotation.is_none()
            && self.aspect.is_none()
            && self.scale.is_none()
    }

    fn into_settings(self) -> AppResult<CropSettings> {
        let area = match (self.x, self.y, self.width, self.height) {
            (None, None, None, None) => None,
            (Some(x), Some(y), Some(width), Some(height)) => Some(CropArea {
                x,
                y,
                width,
                height,
            }),
            _ => {
                return Err(AppError::BadRequest(
                    "crop_x, crop_y, crop_width and crop_height must be sent together".into(),
                ))
            }
        };
        Ok(CropSettings {
            area,
            rotation: Rotation::from_degrees(self.rotation.unwrap_or(0))?,
            aspect: self.aspect,
            scale: self.scale,
        })
    }
}

/// A parsed upload form.
#[derive(Debug)]
pub(crate) struct ImageUpload {
    data: Vec<u8>,
    crop: CropFields,
}

fn parse_field<T: std::str::FromStr>(name: &str, text: &str) -> AppResult<T> {
    text.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid value for '{name}': '{text}'")))
}

/// Read the `file` part and crop fields; unknown parts are ignored.
pub(crate) async fn read_image_upload(mut multipart: Multipart) -> AppResult<ImageUpload> {
    let mut data: Option<Vec<u8>> = None;
    let mut crop = CropFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            data = Some(bytes.to_vec());
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        match name.as_str() {
            "crop_x" => crop.x = Some(parse_field(&name, &text)?),
            "crop_y" => crop.y = Some(parse_field(&name, &text)?),
            "crop_width" => crop.width = Some(parse_field(&name, &text)?),
            "crop_height" => crop.height = Some(parse_field(&name, &text)?),
            "rotation" => crop.rotation = Some(parse_field(&name, &text)?),
            "aspect" => crop.aspect = Some(parse_field(&name, &text)?),
            "scale" => crop.scale = Some(parse_field(&name, &text)?),
            _ => {}
        }
    }

    let data = data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }
    Ok(ImageUpload { data, crop })
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Process and store an upload, returning its location.
///
/// Nothing is written to the database here; callers persist `url` only
/// after this succeeds, so a failed upload leaves the previous value intact.
pub(crate) async fn store_image(
    state: &AppState,
    bucket: Bucket,
    upload: ImageUpload,
) -> AppResult<StoredObject> {
    let max_dimension = state.config.upload_max_dimension;
    let ImageUpload { data, crop } = upload;
    let reencode = bucket == Bucket::SiteImages || !crop.is_empty();

    let encoded: EncodedImage = tokio::task::spawn_blocking(move || {
        if reencode {
            let settings = crop.into_settings()?;
            crop_and_encode(&data, &settings, max_dimension).map_err(AppError::from)
        } else {
            passthrough(data).map_err(AppError::from)
        }
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Image task failed: {e}")))??;

    let name = random_object_name(encoded.extension);
    let stored = state
        .storage
        .put(bucket, &name, encoded.bytes, encoded.content_type)
        .await?;

    tracing::info!(
        %bucket,
        path = %stored.path,
        width = encoded.width,
        height = encoded.height,
        "Image stored"
    );
    Ok(stored)
}

/// Best-effort delete of an object previously stored by this site.
///
/// URLs that do not point into the object store are skipped; failures are
/// logged and never surfaced.
pub(crate) async fn discard_url(state: &AppState, url: &str) {
    let Some((bucket, name)) = state.storage.locate(url) else {
        tracing::debug!(url, "Not a stored object, skipping delete");
        return;
    };
    if let Err(e) = state.storage.delete(bucket, &name).await {
        tracing::warn!(%bucket, name = %name, error = %e, "Failed to delete replaced object");
    }
}

/// Discard every URL in `old` that no longer appears in `kept`.
pub(crate) async fn discard_replaced(state: &AppState, old: &[String], kept: &[String]) {
    for url in old.iter().filter(|u| !kept.contains(u)) {
        discard_url(state, url).await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/uploads/{bucket}
///
/// Store an image and return `{ bucket, path, url }` with 201 Created.
pub async fn upload(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(bucket): Path<String>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<StoredObject>>)> {
    let bucket: Bucket = bucket.parse()?;
    let upload = read_image_upload(multipart).await?;
    let stored = store_image(&state, bucket, upload).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: stored })))
}

/// DELETE /api/v1/admin/uploads/{bucket}/{path}
///
/// Best-effort delete. Returns 204 No Content even when the backend fails.
pub async fn delete_upload(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((bucket, path)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let bucket: Bucket = bucket.parse()?;
    validate_object_name(&path)?;
    if let Err(e) = state.storage.delete(bucket, &path).await {
        tracing::warn!(%bucket, path = %path, error = %e, "Failed to delete object");
    }
    Ok(StatusCode::NO_CONTENT)
}

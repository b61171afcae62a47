//! Image crop-and-encode pipeline.
//!
//! Uploaded pictures are decoded, rotated in quarter turns, cropped to the
//! rectangle chosen in the admin crop surface, downscaled to a maximum edge
//! and re-encoded as JPEG. Pan and zoom are folded into the crop rectangle
//! by the client, so the rectangle is expressed in source pixels after
//! rotation.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::CoreError;

/// MIME type of every cropped image.
pub const OUTPUT_CONTENT_TYPE: &str = "image/jpeg";

/// File extension of every cropped image.
pub const OUTPUT_EXTENSION: &str = "jpg";

/// JPEG quality used for cropped images.
pub const JPEG_QUALITY: u8 = 90;

/// Default cap on the longest edge of a cropped image, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 1600;

/// Relative tolerance when checking a crop rectangle against an aspect ratio.
const ASPECT_TOLERANCE: f64 = 0.02;

/// Largest accepted output scale.
const MAX_SCALE: f64 = 4.0;

/// Accepted source formats.
const ACCEPTED_FORMATS: &[ImageFormat] = &[ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP];

// ---------------------------------------------------------------------------
// Crop settings
// ---------------------------------------------------------------------------

/// Clockwise rotation applied before cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Quarter,
    Half,
    ThreeQuarters,
}

impl Rotation {
    /// Parse a rotation in degrees. Only multiples of 90 are accepted;
    /// negative values rotate counter-clockwise.
    pub fn from_degrees(degrees: i32) -> Result<Self, CoreError> {
        match degrees.rem_euclid(360) {
            0 => Ok(Self::None),
            90 => Ok(Self::Quarter),
            180 => Ok(Self::Half),
            270 => Ok(Self::ThreeQuarters),
            _ => Err(CoreError::Validation(format!(
                "Rotation must be a multiple of 90 degrees, got {degrees}"
            ))),
        }
    }

    fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Self::None => img,
            Self::Quarter => img.rotate90(),
            Self::Half => img.rotate180(),
            Self::ThreeQuarters => img.rotate270(),
        }
    }
}

/// Crop rectangle in source pixels (after rotation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CropArea {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Everything the crop surface sends along with the file.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CropSettings {
    /// Rectangle to keep; `None` keeps the whole (rotated) image.
    pub area: Option<CropArea>,
    pub rotation: Rotation,
    /// Expected width/height ratio of `area`, when the surface locks one.
    pub aspect: Option<f64>,
    /// Output scale applied after cropping (zoom). Must lie in `(0, 4]`.
    pub scale: Option<f64>,
}

/// An encoded image ready for upload.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub extension: &'static str,
    pub width: u32,
    pub height: u32,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Decode, rotate, crop, downscale and encode `data` as JPEG.
pub fn crop_and_encode(
    data: &[u8],
    settings: &CropSettings,
    max_dimension: u32,
) -> Result<EncodedImage, CoreError> {
    let source = decode(data)?;
    let rotated = settings.rotation.apply(source);

    let cropped = match settings.area {
        Some(area) => {
            check_aspect(&area, settings.aspect)?;
            crop(&rotated, &area)?
        }
        None => rotated,
    };

    let scaled = match settings.scale {
        Some(scale) => apply_scale(cropped, scale)?,
        None => cropped,
    };

    let (w, h) = scaled.dimensions();
    let resized = if w.max(h) > max_dimension {
        scaled.resize(max_dimension, max_dimension, FilterType::Lanczos3)
    } else {
        scaled
    };

    let rgb = resized.to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| CoreError::Internal(format!("JPEG encoding failed: {e}")))?;

    Ok(EncodedImage {
        bytes,
        content_type: OUTPUT_CONTENT_TYPE,
        extension: OUTPUT_EXTENSION,
        width: rgb.width(),
        height: rgb.height(),
    })
}

/// Validate `data` as a supported image and keep its original encoding.
///
/// Used for insurance-provider logos, whose transparency would be lost by
/// the JPEG re-encode.
pub fn passthrough(data: Vec<u8>) -> Result<EncodedImage, CoreError> {
    let format = detect_format(&data)?;
    let (width, height) = decode(&data)?.dimensions();
    let (content_type, extension) = match format {
        ImageFormat::Png => ("image/png", "png"),
        ImageFormat::WebP => ("image/webp", "webp"),
        _ => ("image/jpeg", "jpg"),
    };
    Ok(EncodedImage {
        bytes: data,
        content_type,
        extension,
        width,
        height,
    })
}

/// Randomized object name for an encoded image.
pub fn random_object_name(extension: &str) -> String {
    format!("{}.{extension}", Uuid::new_v4())
}

fn detect_format(data: &[u8]) -> Result<ImageFormat, CoreError> {
    let format = image::guess_format(data)
        .map_err(|_| CoreError::Validation("Unrecognized image format".into()))?;
    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(CoreError::Validation(format!(
            "Unsupported image format {format:?}. Supported: JPEG, PNG, WebP"
        )));
    }
    Ok(format)
}

fn decode(data: &[u8]) -> Result<DynamicImage, CoreError> {
    let format = detect_format(data)?;
    image::load(Cursor::new(data), format)
        .map_err(|e| CoreError::Validation(format!("Could not decode image: {e}")))
}

fn check_aspect(area: &CropArea, aspect: Option<f64>) -> Result<(), CoreError> {
    let Some(expected) = aspect else {
        return Ok(());
    };
    if expected <= 0.0 || !expected.is_finite() {
        return Err(CoreError::Validation(format!(
            "Aspect ratio must be positive, got {expected}"
        )));
    }
    if area.height == 0 {
        return Ok(());
    }
    let actual = f64::from(area.width) / f64::from(area.height);
    if ((actual - expected) / expected).abs() > ASPECT_TOLERANCE {
        return Err(CoreError::Validation(format!(
            "Crop area {}x{} does not match aspect ratio {expected:.3}",
            area.width, area.height
        )));
    }
    Ok(())
}

/// Resize `img` by `scale`, the zoom level picked in the cropper.
fn apply_scale(img: DynamicImage, scale: f64) -> Result<DynamicImage, CoreError> {
    if !scale.is_finite() || scale <= 0.0 || scale > MAX_SCALE {
        return Err(CoreError::Validation(format!(
            "Scale must be greater than 0 and at most {MAX_SCALE}, got {scale}"
        )));
    }
    if (scale - 1.0).abs() < f64::EPSILON {
        return Ok(img);
    }
    let (w, h) = img.dimensions();
    let width = ((f64::from(w) * scale).round() as u32).max(1);
    let height = ((f64::from(h) * scale).round() as u32).max(1);
    Ok(img.resize_exact(width, height, FilterType::Lanczos3))
}

/// Crop `img` to `area`, clamping the rectangle to the image bounds.
fn crop(img: &DynamicImage, area: &CropArea) -> Result<DynamicImage, CoreError> {
    let (w, h) = img.dimensions();
    if area.width == 0 || area.height == 0 {
        return Err(CoreError::Validation("Crop area must not be empty".into()));
    }
    if area.x >= w || area.y >= h {
        return Err(CoreError::Validation(format!(
            "Crop origin ({}, {}) lies outside the {w}x{h} image",
            area.x, area.y
        )));
    }
    let width = area.width.min(w - area.x);
    let height = area.height.min(h - area.y);
    Ok(img.crop_imm(area.x, area.y, width, height))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use image::{ImageBuffer, Rgb, Rgba};

    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(width, height, Rgba([10, 120, 200, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(width, height, Rgb([200, 30, 30]));
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, 80)
            .encode_image(&img)
            .unwrap();
        out
    }

    fn area(x: u32, y: u32, width: u32, height: u32) -> CropArea {
        CropArea { x, y, width, height }
    }

    #[test]
    fn rotation_from_degrees() {
        assert_eq!(Rotation::from_degrees(0).unwrap(), Rotation::None);
        assert_eq!(Rotation::from_degrees(90).unwrap(), Rotation::Quarter);
        assert_eq!(Rotation::from_degrees(-90).unwrap(), Rotation::ThreeQuarters);
        assert_eq!(Rotation::from_degrees(540).unwrap(), Rotation::Half);
        assert_matches!(Rotation::from_degrees(45), Err(CoreError::Validation(_)));
    }

    #[test]
    fn crops_to_requested_area() {
        let settings = CropSettings {
            area: Some(area(10, 20, 40, 30)),
            ..Default::default()
        };
        let out = crop_and_encode(&png_bytes(100, 80), &settings, DEFAULT_MAX_DIMENSION).unwrap();
        assert_eq!((out.width, out.height), (40, 30));
        assert_eq!(out.content_type, "image/jpeg");
        assert_eq!(image::guess_format(&out.bytes).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn rotation_happens_before_crop() {
        let settings = CropSettings {
            area: Some(area(0, 0, 80, 100)),
            rotation: Rotation::Quarter,
            aspect: None,
            scale: None,
        };
        // 100x80 rotated a quarter turn is 80x100, so the full rectangle fits.
        let out = crop_and_encode(&png_bytes(100, 80), &settings, DEFAULT_MAX_DIMENSION).unwrap();
        assert_eq!((out.width, out.height), (80, 100));
    }

    #[test]
    fn crop_area_is_clamped_to_bounds() {
        let settings = CropSettings {
            area: Some(area(50, 50, 500, 500)),
            ..Default::default()
        };
        let out = crop_and_encode(&png_bytes(100, 80), &settings, DEFAULT_MAX_DIMENSION).unwrap();
        assert_eq!((out.width, out.height), (50, 30));
    }

    #[test]
    fn crop_origin_outside_image_is_rejected() {
        let settings = CropSettings {
            area: Some(area(100, 0, 10, 10)),
            ..Default::default()
        };
        let result = crop_and_encode(&png_bytes(100, 80), &settings, DEFAULT_MAX_DIMENSION);
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_crop_area_is_rejected() {
        let settings = CropSettings {
            area: Some(area(0, 0, 0, 10)),
            ..Default::default()
        };
        let result = crop_and_encode(&png_bytes(20, 20), &settings, DEFAULT_MAX_DIMENSION);
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn scale_resizes_after_crop() {
        let settings = CropSettings {
            area: Some(area(0, 0, 40, 20)),
            scale: Some(0.5),
            ..Default::default()
        };
        let out = crop_and_encode(&png_bytes(100, 80), &settings, DEFAULT_MAX_DIMENSION).unwrap();
        assert_eq!((out.width, out.height), (20, 10));
    }

    #[test]
    fn scale_out_of_range_is_rejected() {
        for scale in [0.0, -1.0, 5.0, f64::NAN] {
            let settings = CropSettings {
                scale: Some(scale),
                ..Default::default()
            };
            assert_matches!(
                crop_and_encode(&png_bytes(10, 10), &settings, 100),
                Err(CoreError::Validation(_))
            );
        }
    }

    #[test]
    fn aspect_mismatch_is_rejected() {
        let settings = CropSettings {
            area: Some(area(0, 0, 40, 40)),
            aspect: Some(4.0 / 3.0),
            ..Default::default()
        };
        let result = crop_and_encode(&png_bytes(100, 80), &settings, DEFAULT_MAX_DIMENSION);
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn matching_aspect_is_accepted() {
        let settings = CropSettings {
            area: Some(area(0, 0, 80, 60)),
            aspect: Some(4.0 / 3.0),
            ..Default::default()
        };
        assert!(crop_and_encode(&png_bytes(100, 80), &settings, DEFAULT_MAX_DIMENSION).is_ok());
    }

    #[test]
    fn large_output_is_downscaled() {
        let out = crop_and_encode(&png_bytes(400, 200), &CropSettings::default(), 100).unwrap();
        assert_eq!((out.width, out.height), (100, 50));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let result = crop_and_encode(b"not an image", &CropSettings::default(), 100);
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn passthrough_keeps_png_encoding() {
        let data = png_bytes(16, 8);
        let out = passthrough(data.clone()).unwrap();
        assert_eq!(out.bytes, data);
        assert_eq!(out.content_type, "image/png");
        assert_eq!(out.extension, "png");
        assert_eq!((out.width, out.height), (16, 8));
    }

    #[test]
    fn passthrough_detects_jpeg() {
        let out = passthrough(jpeg_bytes(8, 8)).unwrap();
        assert_eq!(out.extension, "jpg");
    }

    #[test]
    fn random_names_are_unique() {
        let a = random_object_name("jpg");
        let b = random_object_name("jpg");
        assert_ne!(a, b);
        assert!(a.ends_with(".jpg"));
    }
}

//! Field-level validation helpers shared by the repositories and handlers.

use std::sync::LazyLock;

use regex::Regex;
use validator::{ValidateEmail, ValidateUrl};

use crate::error::CoreError;

/// Lowest accepted testimonial rating.
pub const MIN_RATING: i32 = 1;

/// Highest accepted testimonial rating.
pub const MAX_RATING: i32 = 5;

/// Maximum length of a content key.
pub const MAX_CONTENT_KEY_LEN: usize = 100;

static CONTENT_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(_[a-z0-9]+)*$").expect("valid regex"));

/// Reject empty or whitespace-only text.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("'{field}' must not be empty")));
    }
    Ok(())
}

/// Validate that an optional text field, when present, is non-empty.
pub fn require_non_empty_opt(field: &str, value: Option<&str>) -> Result<(), CoreError> {
    match value {
        Some(v) => require_non_empty(field, v),
        None => Ok(()),
    }
}

/// Validate a testimonial rating.
pub fn validate_rating(rating: i32) -> Result<(), CoreError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )));
    }
    Ok(())
}

/// Validate a content key: lowercase snake_case, at most 100 characters.
pub fn validate_content_key(key: &str) -> Result<(), CoreError> {
    if key.len() > MAX_CONTENT_KEY_LEN || !CONTENT_KEY_RE.is_match(key) {
        return Err(CoreError::Validation(format!(
            "Invalid content key '{key}'. Use lowercase snake_case up to \
             {MAX_CONTENT_KEY_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate an email address.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if !email.validate_email() {
        return Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

/// Validate that an optional URL, when present, is an absolute URL.
pub fn validate_optional_url(field: &str, url: Option<&str>) -> Result<(), CoreError> {
    match url {
        Some(u) if !u.validate_url() => Err(CoreError::Validation(format!(
            "'{field}' must be an absolute URL"
        ))),
        _ => Ok(()),
    }
}

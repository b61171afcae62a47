//! URL slug generation for doctors and institutes.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid regex"));

/// Build a slug from a display name.
///
/// Accented Latin letters are folded to ASCII, everything else that is not
/// alphanumeric collapses into a single hyphen.
///
/// ```
/// use clinica_core::slug::slugify;
///
/// assert_eq!(slugify("Instituto do Coração"), "instituto-do-coracao");
/// assert_eq!(slugify("Dra. Ana  Lúcia"), "dra-ana-lucia");
/// ```
pub fn slugify(name: &str) -> String {
    let folded: String = name.to_lowercase().chars().map(fold_accent).collect();
    NON_ALNUM_RE
        .replace_all(&folded, "-")
        .trim_matches('-')
        .to_string()
}

/// Validate a client-provided slug.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Use lowercase letters, digits and single hyphens"
        )));
    }
    Ok(())
}

/// Use the explicit slug when given, otherwise derive one from the name.
pub fn resolve_slug(explicit: Option<&str>, name: &str) -> Result<String, CoreError> {
    let slug = match explicit {
        Some(s) => s.to_string(),
        None => slugify(name),
    };
    validate_slug(&slug)?;
    Ok(slug)
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

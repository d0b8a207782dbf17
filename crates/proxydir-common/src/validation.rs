use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid entity id: {0}")]
    InvalidEntityId(String),

    #[error("Invalid region code: {0}")]
    InvalidRegionCode(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

// Entity ids (client, host, server, sponsor) are operator-assigned tokens:
// alphanumeric with internal spaces, dots, underscores or hyphens, up to
// 128 chars. Server ids in particular are multi-word phrases.
static ENTITY_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ._-]{0,127}$").unwrap());

/// Validates an operator-assigned entity identifier.
pub fn validate_entity_id(id: &str) -> ValidationResult<String> {
    if ENTITY_ID_REGEX.is_match(id) {
        Ok(id.to_string())
    } else {
        Err(ValidationError::InvalidEntityId(id.to_string()))
    }
}

/// Normalizes a two-letter region code to uppercase.
///
/// Returns `None` for anything that is not exactly two ASCII letters; callers
/// treat that the same as an absent region.
pub fn normalize_region(region: &str) -> Option<String> {
    let trimmed = region.trim();
    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(trimmed.to_ascii_uppercase())
    } else {
        None
    }
}

//! Request input validation shared by the review and learning-track routes.

use crate::constants::MAX_ID_LENGTH;
use crate::response::AppError;
use crate::review::types::{DifficultyGrade, StatusFilter};

/// Topic and word ids are embedded in sled keys, so `:` is rejected.
pub fn validate_id(field: &str, value: &str) -> Result<(), AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(
            "VALIDATION_ERROR",
            &format!("{field} must not be empty"),
        ));
    }
    if value.len() > MAX_ID_LENGTH {
        return Err(AppError::bad_request(
            "VALIDATION_ERROR",
            &format!("{field} must be at most {MAX_ID_LENGTH} characters"),
        ));
    }
    if value.contains(':') || trimmed.len() != value.len() {
        return Err(AppError::bad_request(
            "VALIDATION_ERROR",
            &format!("{field} contains invalid characters"),
        ));
    }
    Ok(())
}

/// Missing status means `all`.
pub fn parse_review_status(raw: Option<&str>) -> Result<StatusFilter, AppError> {
    match raw {
        None => Ok(StatusFilter::All),
        Some(s) if s.trim().is_empty() => Ok(StatusFilter::All),
        Some(s) => s
            .parse()
            .map_err(|_| AppError::bad_request("INVALID_STATUS", &format!("Unknown status '{s}'"))),
    }
}

pub fn parse_difficulty(raw: &str) -> Result<DifficultyGrade, AppError> {
    raw.parse().map_err(|_| {
        AppError::bad_request(
            "INVALID_DIFFICULTY",
            &format!("Unknown difficulty '{raw}', expected EASY, MEDIUM or HARD"),
        )
    })
}

pub fn clamp_limit(requested: Option<usize>, default_limit: usize, max_limit: usize) -> usize {
    requested.unwrap_or(default_limit).clamp(1, max_limit.max(1))
}

/// Language codes are 2-16 letters, digits or hyphens.
pub fn validate_language_code(code: &str) -> Result<(), AppError> {
    let valid = (2..=16).contains(&code.len())
        && code.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(AppError::bad_request(
            "VALIDATION_ERROR",
            "languageCode must be 2-16 letters, digits or hyphens",
        ))
    }
}

//! Boundary validation for incoming records.

use thiserror::Error;

/// Earliest birth year accepted for a patient.
pub const MIN_BIRTH_YEAR: i32 = 1900;

/// A rejected input record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("birth year must be {MIN_BIRTH_YEAR} or later, got {0}")]
    BirthYear(i32),
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    // NaN fails this comparison too
    if !(value > 0.0) {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !(value >= 0.0) {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(())
}

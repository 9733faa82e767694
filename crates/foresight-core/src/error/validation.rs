//! Input validation failures, raised before any pipeline work begins.

/// A feature record failed validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A field violated a domain invariant.
    #[error("field '{field}' is invalid: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    /// A numeric field fell outside its allowed range.
    #[error("field '{field}' out of range: {value} not in [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A numeric field was NaN or infinite.
    #[error("field '{field}' must be finite")]
    NonFinite { field: &'static str },

    /// A required field was empty.
    #[error("field '{field}' must not be empty")]
    Empty { field: &'static str },
}

impl ValidationError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field, for structured API error details.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidField { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::NonFinite { field }
            | ValidationError::Empty { field } => field,
        }
    }
}

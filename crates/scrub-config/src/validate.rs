//! Configuration validation errors.

use scrub_common::ScrubError;
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::Io(_) => 60,
            ValidationError::Parse(_) => 61,
            ValidationError::InvalidValue { .. } => 65,
        }
    }
}

impl From<ValidationError> for ScrubError {
    fn from(err: ValidationError) -> Self {
        ScrubError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ValidationError::Io("x".into()).code(), 60);
        assert_eq!(ValidationError::Parse("x".into()).code(), 61);
        assert_eq!(
            ValidationError::InvalidValue {
                field: "secret_key".into(),
                message: "empty".into()
            }
            .code(),
            65
        );
    }

    #[test]
    fn test_converts_to_configuration_error() {
        let err: ScrubError = ValidationError::Parse("bad yaml".into()).into();
        assert!(matches!(err, ScrubError::Configuration(_)));
        assert!(!err.is_recoverable());
    }
}

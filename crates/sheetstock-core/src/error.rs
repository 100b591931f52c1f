//! # Error Types
//!
//! Domain-specific error types for sheetstock-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sheetstock-core errors (this file)                                    │
//! │  ├── CoreError        - Barcode derivation and domain errors           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  sheetstock-db errors (separate crate)                                 │
//! │  └── DbError          - Database, file and config failures             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → CLI exit message        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Parsing never lands here: thickness, material and dimension parsing
//! degrade to `None` so a bulk import can keep going past a bad row. Only
//! the uniqueness resolver's attempt cap is a hard stop.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Caller input that was explicitly validated and rejected.
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// The uniqueness resolver gave up.
    ///
    /// ## When This Occurs
    /// - The existence predicate always answers "taken" (broken lookup)
    /// - Pathological collision density around one candidate
    ///
    /// Either way it is a system-level bug, not data variance, so callers
    /// should abort the batch instead of skipping the row.
    #[error("Could not find a free barcode for {candidate} after {attempts} attempts")]
    ResolutionExhausted { candidate: String, attempts: usize },

    /// Malformed internal tables or rule overrides.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidInput error.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when form or spreadsheet input doesn't meet requirements.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., unparseable date or quantity).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ResolutionExhausted {
            candidate: "12GB510".to_string(),
            attempts: 3,
        };
        assert_eq!(
            err.to_string(),
            "Could not find a free barcode for 12GB510 after 3 attempts"
        );

        let err = CoreError::invalid_input("fallback length", "must be at least 6");
        assert_eq!(err.to_string(), "Invalid fallback length: must be at least 6");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "barcode".to_string(),
        };
        assert_eq!(err.to_string(), "barcode is required");

        let err = ValidationError::TooLong {
            field: "barcode".to_string(),
            max: 48,
        };
        assert_eq!(err.to_string(), "barcode must be at most 48 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

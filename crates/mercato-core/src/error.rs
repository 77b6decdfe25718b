//! # Error Types
//!
//! Domain-specific error types for mercato-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mercato-core errors (this file)                                       │
//! │  └── ValidationError  - Boundary validation failures                   │
//! │                                                                         │
//! │  mercato-db errors (separate crate)                                    │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── PublishError     - Publish-report failures (constraint,          │
//! │                         product-not-found, invalid submission)        │
//! │                                                                         │
//! │  Flow: ValidationError → PublishError → route layer → client          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, field name, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a submitted report doesn't meet structural
/// requirements. Used for early validation before any database work.
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

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Batch exceeds the allowed number of line items.
    #[error("a report cannot carry more than {max} line items")]
    BatchTooLarge { max: usize },
}

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::Required {
            field: "product_id".to_string(),
        };
        assert_eq!(err.to_string(), "product_id is required");

        let err = ValidationError::MustBeNonNegative {
            field: "units_sold".to_string(),
        };
        assert_eq!(err.to_string(), "units_sold must not be negative");

        let err = ValidationError::BatchTooLarge { max: 200 };
        assert_eq!(err.to_string(), "a report cannot carry more than 200 line items");
    }
}

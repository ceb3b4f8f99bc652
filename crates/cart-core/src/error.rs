//! # Error Types
//!
//! Domain-specific error types for cart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cart-core errors (this file)                                          │
//! │  ├── CoreError        - Snapshot codec and domain failures             │
//! │  └── ValidationError  - Invariant / input validation failures          │
//! │                                                                         │
//! │  cart-store errors (separate crate)                                    │
//! │  └── StoreError       - Key-value store failures                       │
//! │                                                                         │
//! │  cart-state errors                                                     │
//! │  └── CartError        - What the integrating application sees          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CartError                         │
//! │        (hydration swallows these and falls back to an empty cart)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A snapshot could not be encoded or decoded.
    ///
    /// ## When This Occurs
    /// - Persisted text is not JSON, or not an array of line items
    /// - A field has the wrong type (e.g. `"quantity": "two"`)
    #[error("Snapshot codec error: {0}")]
    Codec(String),

    /// A decoded snapshot or caller input broke a cart rule.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Codec(err.to_string())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Validation failures for line items and product input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Duplicate value (e.g. two lines with the same product id).
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },
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
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "id".to_string(),
        };
        assert_eq!(err.to_string(), "id is required");

        let err = ValidationError::Duplicate {
            field: "id".to_string(),
            value: "42".to_string(),
        };
        assert_eq!(err.to_string(), "id '42' appears more than once");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_json_error_converts_to_codec() {
        let json_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let core_err: CoreError = json_err.into();
        assert!(matches!(core_err, CoreError::Codec(_)));
    }
}

//! # Error Types
//!
//! Domain-specific error types for stall-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stall-core errors (this file)                                         │
//! │  ├── CoreError        - Ledger / cart / import rule violations         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stall-db errors (separate crate)                                      │
//! │  └── DbError          - Storage failures (→ StorageUnavailable)        │
//! │                                                                         │
//! │  App errors                                                             │
//! │  └── ApiError         - What the operator sees (notification)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Notification           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is recovered at the point of the user action. None of
//! them should ever end a session.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Ledger, cart and import errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An item with this code already exists.
    #[error("Item code '{0}' already exists")]
    DuplicateCode(String),

    /// No item carries this code.
    #[error("Item not found: {0}")]
    NotFound(String),

    /// The item has already been sold.
    ///
    /// ## When This Occurs
    /// - Selling or checking out a code twice
    /// - Adding a sold item to the cart
    #[error("Item {0} is already sold")]
    AlreadySold(String),

    /// The item is in stock, so there is nothing to return.
    #[error("Item {0} is already available")]
    AlreadyAvailable(String),

    /// The code is already staged in the cart.
    #[error("Item {0} is already in the cart")]
    AlreadyInCart(String),

    /// A cart line index that does not exist.
    #[error("Cart has no line {index} (cart holds {len} lines)")]
    InvalidCartLine { index: usize, len: usize },

    /// The import header has no product-code column.
    #[error("Import is missing the required '{0}' column")]
    MissingRequiredColumn(String),

    /// Factory reset attempted with the wrong PIN.
    #[error("Incorrect PIN")]
    IncorrectPin,

    /// The CSV reader or writer failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., a non-numeric PIN).
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
        let err = CoreError::AlreadySold("SAR101".to_string());
        assert_eq!(err.to_string(), "Item SAR101 is already sold");

        let err = CoreError::InvalidCartLine { index: 4, len: 2 };
        assert_eq!(err.to_string(), "Cart has no line 4 (cart holds 2 lines)");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "code".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

//! # Validation Module
//!
//! Input validation for item codes and the factory-reset PIN.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Presentation                                                  │
//! │  └── Basic format checks, immediate feedback                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  └── Code shape, PIN comparison                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Ledger                                                        │
//! │  └── Uniqueness, status transitions                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest code accepted from a form, a scan, or an import cell.
pub const MAX_CODE_LEN: usize = 64;

/// Validates an already-normalized item code.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
///
/// ```rust
/// use stall_core::validation::validate_code;
///
/// assert!(validate_code("SAR101").is_ok());
/// assert!(validate_code("").is_err());
/// ```
pub fn validate_code(code: &str) -> ValidationResult<()> {
    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.chars().count() > MAX_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_CODE_LEN,
        });
    }

    Ok(())
}

/// Compares an entered PIN against the configured reset PIN.
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - Non-numeric input is a format error, not a wrong PIN
/// - Any other mismatch → [`CoreError::IncorrectPin`]
pub fn verify_reset_pin(entered: &str, expected: u32) -> CoreResult<()> {
    let entered = entered.trim();

    let pin: u32 = entered.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "pin".to_string(),
        reason: "must be numeric".to_string(),
    })?;

    if pin != expected {
        return Err(CoreError::IncorrectPin);
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_code() {
        assert!(validate_code("SAR101").is_ok());
        assert!(validate_code("A-1/B").is_ok());
        assert_eq!(
            validate_code(""),
            Err(ValidationError::Required {
                field: "code".to_string()
            })
        );
        assert!(validate_code(&"A".repeat(65)).is_err());
    }

    #[test]
    fn test_verify_reset_pin() {
        assert!(verify_reset_pin("2580", 2580).is_ok());
        assert!(verify_reset_pin(" 2580 ", 2580).is_ok());
        assert!(matches!(verify_reset_pin("1111", 2580), Err(CoreError::IncorrectPin)));
        assert!(matches!(
            verify_reset_pin("abcd", 2580),
            Err(CoreError::Validation(ValidationError::InvalidFormat { .. }))
        ));
    }
}

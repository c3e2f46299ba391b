//! # Code Input Adapter
//!
//! Turns whatever the operator typed, or whatever the scanner decoded,
//! into the canonical item code the ledger looks up.
//!
//! ```text
//!  "  sar101 "      ──┐
//!  "\"SAR101\""     ──┼──► normalize_code ──► "SAR101"
//!  scan: "sar101\n" ──┘
//! ```

use tracing::debug;

use crate::validation::{validate_code, ValidationResult};

/// Where a code came from. Both sources normalize identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeInput {
    /// Typed into the code field.
    Manual(String),
    /// Decoded text handed over by the camera scanner.
    Scanned(String),
}

impl CodeInput {
    /// Normalizes the raw text into a canonical code.
    pub fn normalize(&self) -> ValidationResult<String> {
        let (source, raw) = match self {
            CodeInput::Manual(raw) => ("manual", raw),
            CodeInput::Scanned(raw) => ("scan", raw),
        };
        let code = normalize_code(raw)?;
        debug!(source = source, code = %code, "Code input normalized");
        Ok(code)
    }
}

/// Canonical form of an item code.
///
/// ## Rules
/// - Double quotes are removed (spreadsheet exports often keep them)
/// - Surrounding whitespace is trimmed
/// - Letters are upper-cased
/// - The result must pass [`validate_code`]
///
/// ```rust
/// use stall_core::normalize_code;
///
/// assert_eq!(normalize_code(" \"sar101\" ").unwrap(), "SAR101");
/// assert!(normalize_code("  ").is_err());
/// ```
pub fn normalize_code(raw: &str) -> ValidationResult<String> {
    let code: String = raw.chars().filter(|c| *c != '"').collect();
    let code = code.trim().to_uppercase();
    validate_code(&code)?;
    Ok(code)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("sar101").unwrap(), "SAR101");
        assert_eq!(normalize_code("\tSar-7 \n").unwrap(), "SAR-7");
        assert_eq!(normalize_code("\"\"kp12\"\"").unwrap(), "KP12");
        assert!(normalize_code("").is_err());
        assert!(normalize_code("\"\"").is_err());
    }

    #[test]
    fn test_manual_and_scanned_agree() {
        let manual = CodeInput::Manual("  sar101".to_string()).normalize().unwrap();
        let scanned = CodeInput::Scanned("SAR101\r\n".to_string()).normalize().unwrap();
        assert_eq!(manual, scanned);
    }
}

//! # API Error Type
//!
//! Unified error type for commands, and the notification the operator sees.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Stall POS                              │
//! │                                                                         │
//! │  Operator action (scan, add, checkout, reset ...)                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Storage Error? ─── DbError::QueryFailed("...") ──┐             │  │
//! │  │         │                                         │             │  │
//! │  │         ▼                                         ▼             │  │
//! │  │  Rule Violation? ─── CoreError::AlreadySold ──── ApiError ─────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Notification { kind: Error, message: "Item SAR101 is already sold" }  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here ends the session: every error becomes a notification and
//! the operator carries on.

use serde::Serialize;
use stall_core::CoreError;
use stall_db::DbError;
use std::fmt;

/// Error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "ALREADY_SOLD",
///   "message": "Item SAR101 is already sold"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    DuplicateCode,
    NotFound,
    AlreadySold,
    AlreadyAvailable,
    AlreadyInCart,
    MissingRequiredColumn,
    IncorrectPin,

    /// Input validation failed
    ValidationError,

    /// The durable store could not be read or written
    StorageUnavailable,

    /// Anything else
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::StorageUnavailable, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts storage errors to API errors.
///
/// Every storage failure is `StorageUnavailable` to the operator; the
/// detail goes to the log.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        tracing::warn!(error = %err, "Storage unavailable");
        match err {
            DbError::Serialization(_) => {
                ApiError::storage("Saved data could not be read; working in memory only")
            }
            _ => ApiError::storage("Storage unavailable; changes are kept in memory only"),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        let code = match err {
            CoreError::DuplicateCode(_) => ErrorCode::DuplicateCode,
            CoreError::NotFound(_) => ErrorCode::NotFound,
            CoreError::AlreadySold(_) => ErrorCode::AlreadySold,
            CoreError::AlreadyAvailable(_) => ErrorCode::AlreadyAvailable,
            CoreError::AlreadyInCart(_) => ErrorCode::AlreadyInCart,
            CoreError::MissingRequiredColumn(_) => ErrorCode::MissingRequiredColumn,
            CoreError::IncorrectPin => ErrorCode::IncorrectPin,
            CoreError::InvalidCartLine { .. } | CoreError::Validation(_) | CoreError::Csv(_) => {
                ErrorCode::ValidationError
            }
        };
        ApiError::new(code, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Notification
// =============================================================================

/// How a notification is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    /// Nothing went wrong, nothing changed (empty cart, empty export)
    Info,
    Error,
}

/// A short, auto-dismissing message for the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Notification {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Notification {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notification {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

impl From<ApiError> for Notification {
    fn from(err: ApiError) -> Self {
        Notification::error(err.message)
    }
}

/// Folds a command result into the notification shown for it.
impl From<Result<Notification, ApiError>> for Notification {
    fn from(result: Result<Notification, ApiError>) -> Self {
        result.unwrap_or_else(Notification::from)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            NotificationKind::Success => "✓",
            NotificationKind::Info => "i",
            NotificationKind::Error => "✗",
        };
        write!(f, "{} {}", tag, self.message)
    }
}

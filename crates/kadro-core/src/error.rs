//! Error types module
//!
//! This module provides the core error types used throughout the Kadro
//! application. All errors are unified under the `AppError` enum, which
//! distinguishes storage, identifier, and workflow-precondition errors.
//!
//! Every variant is a recoverable-by-the-caller business condition except
//! `NotConnected` and `Internal`; none of them indicates corruption, and the
//! specific kind is never collapsed into a generic failure.

use crate::models::lifecycle::ProcessKind;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented.
/// This trait allows errors to self-describe their transport characteristics
/// without this crate depending on any transport.
pub trait ErrorMetadata {
    /// HTTP status code an out-of-scope transport layer should map this to
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "LIFECYCLE_CONFLICT")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried as-is)
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The store client has not completed `connect()`. Fatal until fixed.
    #[error("Store not connected")]
    NotConnected,

    #[error("Invalid tenant id: {0}")]
    InvalidTenant(String),

    #[error("Invalid employee: {0}")]
    InvalidEmployee(String),

    /// An open competing lifecycle process exists for the employee.
    #[error("Lifecycle conflict: open {conflict} exists ({reason})")]
    LifecycleConflict {
        conflict: ProcessKind,
        reason: String,
    },

    #[error("Already clocked in: {0}")]
    AlreadyClockedIn(String),

    #[error("Not clocked in: {0}")]
    NotClockedIn(String),

    #[error("Already clocked out: {0}")]
    AlreadyClockedOut(String),

    #[error("Regularization already requested: {0}")]
    RegularizationAlreadyRequested(String),

    #[error("No regularization request: {0}")]
    NoRegularizationRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("UUID parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::NotConnected => (503, "STORE_NOT_CONNECTED", false, LogLevel::Error),
        AppError::InvalidTenant(_) => (400, "INVALID_TENANT", false, LogLevel::Debug),
        AppError::InvalidEmployee(_) => (400, "INVALID_EMPLOYEE", false, LogLevel::Debug),
        AppError::LifecycleConflict { .. } => (409, "LIFECYCLE_CONFLICT", false, LogLevel::Debug),
        AppError::AlreadyClockedIn(_) => (409, "ALREADY_CLOCKED_IN", false, LogLevel::Debug),
        AppError::NotClockedIn(_) => (409, "NOT_CLOCKED_IN", false, LogLevel::Debug),
        AppError::AlreadyClockedOut(_) => (409, "ALREADY_CLOCKED_OUT", false, LogLevel::Debug),
        AppError::RegularizationAlreadyRequested(_) => {
            (409, "REGULARIZATION_ALREADY_REQUESTED", false, LogLevel::Debug)
        }
        AppError::NoRegularizationRequest(_) => {
            (409, "NO_REGULARIZATION_REQUEST", false, LogLevel::Debug)
        }
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::Unauthorized(_) => (403, "UNAUTHORIZED", false, LogLevel::Warn),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(AppError::NotConnected.error_code(), "STORE_NOT_CONNECTED");
        assert_eq!(
            AppError::LifecycleConflict {
                conflict: ProcessKind::Resignation,
                reason: "pending".into(),
            }
            .error_code(),
            "LIFECYCLE_CONFLICT"
        );
        assert_eq!(
            AppError::AlreadyClockedOut("x".into()).http_status_code(),
            409
        );
    }

    #[test]
    fn test_business_errors_are_not_retriable() {
        assert!(!AppError::AlreadyClockedIn("x".into()).is_recoverable());
        assert!(AppError::Internal("x".into()).is_recoverable());
    }
}

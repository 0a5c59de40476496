//! Error types

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// - `code` identifies the kind of failure
/// - `message` is the human-readable text shown to the operator
/// - `details` holds structured context for developers (field names,
///   required vs. available lines, spooler stderr, ...)
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

/// Detail key under which developer diagnostics are stored
const DIAGNOSTIC_KEY: &str = "diagnostic";

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Attach a developer diagnostic (stderr output, source error chain)
    pub fn with_diagnostic(self, diagnostic: impl Into<String>) -> Self {
        self.with_detail(DIAGNOSTIC_KEY, diagnostic.into())
    }

    /// Developer diagnostic, if one was attached
    pub fn diagnostic(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|d| d.get(DIAGNOSTIC_KEY))
            .and_then(Value::as_str)
    }

    /// Look up a detail value
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.as_ref().and_then(|d| d.get(key))
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ConfigError, msg)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::with_message(ErrorCode::IoError, err.to_string())
    }
}

/// Result alias for operations returning [`AppError`]
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_code_message() {
        let err = AppError::new(ErrorCode::ReceiptNotFound);
        assert_eq!(err.message, "Receipt not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_details_and_diagnostic() {
        let err = AppError::with_message(ErrorCode::PrintFailed, "lp exited with status 1")
            .with_detail("printer", "HP_LaserJet_1022n")
            .with_diagnostic("lp: The printer or class does not exist.");

        assert_eq!(
            err.detail("printer").and_then(Value::as_str),
            Some("HP_LaserJet_1022n")
        );
        assert_eq!(
            err.diagnostic(),
            Some("lp: The printer or class does not exist.")
        );
        assert_eq!(err.to_string(), "lp exited with status 1");
    }

    #[test]
    fn test_not_found_records_resource() {
        let err = AppError::not_found("Receipt FACT-00042");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Receipt FACT-00042 not found");
    }
}

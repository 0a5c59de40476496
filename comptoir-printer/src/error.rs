//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Network connection error
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Timeout waiting for printer or spooler
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Spooler command could not be started (not installed)
    #[error("Print spooler unavailable: {0}")]
    SpoolerUnavailable(String),

    /// Spooler does not know the destination
    #[error("Printer not found: {0}")]
    PrinterNotFound(String),

    /// Spooler exited with a failure status
    #[error("Spooler failed with status {status:?}")]
    Spooler { status: Option<i32>, stderr: String },
}

impl PrintError {
    /// Raw diagnostic text produced by the device or spooler, if any
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            PrintError::Spooler { stderr, .. } if !stderr.is_empty() => Some(stderr),
            _ => None,
        }
    }
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;

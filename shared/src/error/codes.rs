//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Receipt errors
//! - 2xxx: Layout errors
//! - 3xxx: Product errors
//! - 4xxx: Printer errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Codes serialize as plain `u16` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Receipt ====================
    /// Receipt not found
    ReceiptNotFound = 1001,
    /// Receipt has no line items
    ReceiptEmpty = 1002,
    /// Receipt number already used
    ReceiptNumberConflict = 1003,

    // ==================== 2xxx: Layout ====================
    /// Page geometry cannot hold the header and the footer
    GeometryTooSmall = 2001,
    /// A block is taller than a whole page
    BlockTooLarge = 2002,
    /// Text budget below the minimum for an ellipsis
    TextBudgetTooSmall = 2003,

    // ==================== 3xxx: Product ====================
    /// Product not found
    ProductNotFound = 3001,
    /// Invalid product price
    ProductInvalidPrice = 3002,
    /// Invalid product quantity
    ProductInvalidQuantity = 3003,

    // ==================== 4xxx: Printer ====================
    /// Printer not available (offline or unreachable)
    PrinterNotAvailable = 4001,
    /// Printer unknown to the spooler
    PrinterNotFound = 4002,
    /// Print operation failed
    PrintFailed = 4003,
    /// Printer or spooler timed out
    PrintTimeout = 4004,
    /// Spooler command missing on this system
    SpoolerUnavailable = 4005,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
    /// File system error
    IoError = 9006,
    /// Storage corrupted (data file damaged)
    StorageCorrupted = 9403,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            // Receipt
            ErrorCode::ReceiptNotFound => "Receipt not found",
            ErrorCode::ReceiptEmpty => "Receipt has no items",
            ErrorCode::ReceiptNumberConflict => "Receipt number already exists",

            // Layout
            ErrorCode::GeometryTooSmall => "Page geometry too small for header and footer",
            ErrorCode::BlockTooLarge => "Block does not fit within the page geometry",
            ErrorCode::TextBudgetTooSmall => "Text budget too small",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Invalid product price",
            ErrorCode::ProductInvalidQuantity => "Invalid product quantity",

            // Printer
            ErrorCode::PrinterNotAvailable => "Printer not available",
            ErrorCode::PrinterNotFound => "Printer not found",
            ErrorCode::PrintFailed => "Print operation failed",
            ErrorCode::PrintTimeout => "Printer did not respond in time",
            ErrorCode::SpoolerUnavailable => "Print spooler not available",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::IoError => "File system error",
            ErrorCode::StorageCorrupted => "Storage corrupted (data file damaged)",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),

            // Receipt
            1001 => Ok(ErrorCode::ReceiptNotFound),
            1002 => Ok(ErrorCode::ReceiptEmpty),
            1003 => Ok(ErrorCode::ReceiptNumberConflict),

            // Layout
            2001 => Ok(ErrorCode::GeometryTooSmall),
            2002 => Ok(ErrorCode::BlockTooLarge),
            2003 => Ok(ErrorCode::TextBudgetTooSmall),

            // Product
            3001 => Ok(ErrorCode::ProductNotFound),
            3002 => Ok(ErrorCode::ProductInvalidPrice),
            3003 => Ok(ErrorCode::ProductInvalidQuantity),

            // Printer
            4001 => Ok(ErrorCode::PrinterNotAvailable),
            4002 => Ok(ErrorCode::PrinterNotFound),
            4003 => Ok(ErrorCode::PrintFailed),
            4004 => Ok(ErrorCode::PrintTimeout),
            4005 => Ok(ErrorCode::SpoolerUnavailable),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::IoError),
            9403 => Ok(ErrorCode::StorageCorrupted),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

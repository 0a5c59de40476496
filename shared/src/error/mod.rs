//! Unified error system for Comptoir
//!
//! - [`ErrorCode`]: standardized error codes for all error kinds
//! - [`ErrorCategory`]: classification of errors by domain
//! - [`AppError`]: error value carrying a code, a message and diagnostic details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Receipt errors
//! - 2xxx: Layout errors
//! - 3xxx: Product errors
//! - 4xxx: Printer errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::ReceiptNotFound);
//!
//! let err = AppError::validation("quantity must be positive")
//!     .with_detail("field", "quantity");
//! assert_eq!(err.code, ErrorCode::ValidationFailed);
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};

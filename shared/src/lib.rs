//! Shared types for the Comptoir workspace
//!
//! Receipt, product and settings models, page geometries, and the unified
//! error type used by the layout engine, the printer transports and the
//! application crate.

pub mod error;
pub mod models;
pub mod validation;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{
    CompanyProfile, LineItem, PageGeometry, PaperSize, Product, ReceiptDraft, ReceiptRecord,
    ReceiptSettings, ReceiptSummary, SalesStatistics, TopProduct,
};
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};

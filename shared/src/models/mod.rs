//! Data models
//!
//! Receipts and line items, the company profile and typed settings, page
//! geometries, and catalogue/statistics rows.

pub mod geometry;
pub mod product;
pub mod receipt;
pub mod settings;

pub use geometry::{PageGeometry, PaperSize};
pub use product::{Product, SalesStatistics, TopProduct};
pub use receipt::{LineItem, ReceiptDraft, ReceiptRecord, ReceiptSummary};
pub use settings::{CompanyProfile, ReceiptSettings};

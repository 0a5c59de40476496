//! Embedded redb storage for receipts, products and settings

pub mod storage;

pub use storage::{ReceiptStorage, StorageError, StorageResult, receipt_number};

//! Comptoir - point-of-sale receipts
//!
//! # Module structure
//!
//! ```text
//! comptoir/src/
//! ├── core/          # process configuration
//! ├── db/            # redb storage (receipts, products, settings)
//! ├── printing/      # text grid, sections, paginator, renderers
//! ├── services/      # issue / reprint / export workflows
//! ├── utils/         # logging, clock
//! └── cli.rs         # command line interface
//! ```

pub mod cli;
pub mod core;
pub mod db;
pub mod printing;
pub mod services;
pub mod utils;

pub use core::Config;
pub use db::{ReceiptStorage, StorageError};
pub use printing::{LayoutError, Page, layout_receipt, paginate};
pub use services::{Artifact, Delivery, DeliveryStatus, IssueOutcome, PrinterKind, ReceiptService};
pub use shared::error::{AppError, AppResult, ErrorCode};

pub use utils::logger::init_logger_with_file;

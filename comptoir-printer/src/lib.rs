//! # comptoir-printer
//!
//! Low-level printing capabilities for receipt printers.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building
//! - Windows-1252 encoding for French receipts
//! - Network printing (TCP port 9100)
//! - Spooler printing (`lp` / `lpstat`)
//!
//! Business logic (WHAT to print) stays in the `comptoir` crate, which lays
//! receipts out into pages and hands finished bytes to a [`Printer`].
//!
//! ## Example
//!
//! ```ignore
//! use comptoir_printer::{EscPosBuilder, NetworkPrinter, Printer};
//!
//! let mut builder = EscPosBuilder::new();
//! builder.bold();
//! builder.line("          TOTAL A PAYER");
//! builder.bold_off();
//! builder.cut_feed(3);
//!
//! let printer = NetworkPrinter::from_addr("192.168.1.100:9100")?;
//! printer.print(&builder.build()).await?;
//! ```

mod encoding;
mod error;
mod escpos;
mod printer;

// Re-exports
pub use encoding::{convert_to_cp1252, encode_cp1252};
pub use error::{PrintError, PrintResult};
pub use escpos::EscPosBuilder;
pub use printer::{AnyPrinter, DEFAULT_PORT, NetworkPrinter, Printer, SpoolPrinter};

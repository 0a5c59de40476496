//! Receipt layout and rendering
//!
//! ```text
//! ReceiptRecord + CompanyProfile
//!     → SectionBuilder   (header, item blocks, footer)
//!     → paginate         (pages of exactly max_lines lines)
//!     → PageRenderer     (text, ESC/POS, PDF)
//! ```
//!
//! Everything up to the renderers is pure and synchronous, so it can run on
//! any thread without locking.

pub mod error;
pub mod format;
pub mod names;
pub mod paginator;
pub mod renderer;
pub mod sections;
pub mod textgrid;
pub mod words;

pub use error::{BlockKind, LayoutError, LayoutResult, TextError};
pub use paginator::{Block, Page, paginate};
pub use renderer::{EscPosRenderer, PageRenderer, PdfRenderer, TextRenderer};
pub use sections::{ReceiptSections, SectionBuilder};

use shared::models::{CompanyProfile, PageGeometry, ReceiptRecord};

/// Lay a receipt out on pages of the given geometry
pub fn layout_receipt(
    record: &ReceiptRecord,
    company: &CompanyProfile,
    geometry: &PageGeometry,
    amount_in_words: bool,
) -> LayoutResult<Vec<Page>> {
    let sections = SectionBuilder::new(company, geometry.width())
        .with_amount_in_words(amount_in_words)
        .build(record)?;
    paginate(&sections.header, &sections.items, &sections.footer, geometry)
}

//! Page renderers
//!
//! Renderers turn the paginated output into bytes for one medium. They
//! never re-flow content: page breaks, padding and footer placement come
//! from the paginator unchanged.

mod escpos;
mod pdf;
mod text;

pub use escpos::EscPosRenderer;
pub use pdf::PdfRenderer;
pub use text::{FORM_FEED, TextRenderer};

use super::paginator::Page;

/// Output encoding of a page sequence
pub trait PageRenderer {
    fn render(&self, pages: &[Page]) -> Vec<u8>;
}

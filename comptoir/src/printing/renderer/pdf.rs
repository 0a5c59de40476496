//! PDF output
//!
//! One PDF page per layout page, monospaced Courier sized so the character
//! grid fills the paper inside a small margin. Pages after the first carry
//! a page number in the bottom margin.

use comptoir_printer::encode_cp1252;
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use shared::models::PaperSize;

use super::PageRenderer;
use crate::printing::paginator::Page;

/// Courier advance width, as a fraction of the font size
const COURIER_ADVANCE: f32 = 0.6;

/// Margin on every side, in points (about 5mm)
const MARGIN_PT: f32 = 14.0;

const FONT_NAME: Name<'static> = Name(b"F1");

/// PDF renderer for one paper size
pub struct PdfRenderer {
    paper: PaperSize,
}

impl PdfRenderer {
    pub fn new(paper: PaperSize) -> Self {
        Self { paper }
    }

    /// Font size and line height fitting the paper's character grid
    pub fn metrics(&self) -> (f32, f32) {
        let (w, h) = self.paper.size_pt();
        let geometry = self.paper.geometry();
        let usable_w = w - 2.0 * MARGIN_PT;
        let usable_h = h - 2.0 * MARGIN_PT;
        let by_width = usable_w / (geometry.width() as f32 * COURIER_ADVANCE);
        let leading = usable_h / geometry.max_lines() as f32;
        (by_width.min(leading), leading)
    }

    fn page_content(&self, page: &Page, number: usize, count: usize) -> Vec<u8> {
        let (_, h) = self.paper.size_pt();
        let (font_size, leading) = self.metrics();

        let mut content = Content::new();
        content.begin_text();
        content.set_font(FONT_NAME, font_size);
        content.next_line(MARGIN_PT, h - MARGIN_PT - font_size);
        for (i, line) in page.lines().iter().enumerate() {
            if i > 0 {
                content.next_line(0.0, -leading);
            }
            let line = line.trim_end();
            if !line.is_empty() {
                content.show(Str(&encode_cp1252(line)));
            }
        }
        content.end_text();

        if number > 1 {
            let label = format!("Page {number}/{count}");
            let size = (font_size * 0.8).max(5.0);
            let (w, _) = self.paper.size_pt();
            let x = w - MARGIN_PT - label.len() as f32 * size * COURIER_ADVANCE;
            content.begin_text();
            content.set_font(FONT_NAME, size);
            content.next_line(x, MARGIN_PT / 2.0);
            content.show(Str(label.as_bytes()));
            content.end_text();
        }

        content.finish().to_vec()
    }
}

impl PageRenderer for PdfRenderer {
    fn render(&self, pages: &[Page]) -> Vec<u8> {
        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        let catalog_id = alloc();
        let pages_id = alloc();
        let font_id = alloc();
        let ids: Vec<(Ref, Ref)> = pages.iter().map(|_| (alloc(), alloc())).collect();

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(ids.iter().map(|(page_id, _)| *page_id))
            .count(ids.len() as i32);
        pdf.type1_font(font_id)
            .base_font(Name(b"Courier"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        let (w, h) = self.paper.size_pt();
        let count = pages.len();
        for (i, (page, (page_id, content_id))) in pages.iter().zip(&ids).enumerate() {
            {
                let mut pdf_page = pdf.page(*page_id);
                pdf_page
                    .media_box(Rect::new(0.0, 0.0, w, h))
                    .parent(pages_id)
                    .contents(*content_id);
                pdf_page.resources().fonts().pair(FONT_NAME, font_id);
            }

            let data = self.page_content(page, i + 1, count);
            pdf.stream(*content_id, &data);
        }

        pdf.finish()
    }
}

//! Plain text output for spooled laser prints and previews

use super::PageRenderer;
use crate::printing::paginator::Page;

/// Page separator understood by line printers and `lp`
pub const FORM_FEED: char = '\x0c';

/// UTF-8 text, one line per row, pages separated by a form feed
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer {
    trim_trailing: bool,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strip trailing spaces from each line (previews, diffs)
    pub fn trimmed() -> Self {
        Self {
            trim_trailing: true,
        }
    }

    pub fn render_string(&self, pages: &[Page]) -> String {
        let mut out = String::new();
        for (i, page) in pages.iter().enumerate() {
            if i > 0 {
                out.push(FORM_FEED);
            }
            for line in page.lines() {
                if self.trim_trailing {
                    out.push_str(line.trim_end());
                } else {
                    out.push_str(line);
                }
                out.push('\n');
            }
        }
        out
    }
}

impl PageRenderer for TextRenderer {
    fn render(&self, pages: &[Page]) -> Vec<u8> {
        self.render_string(pages).into_bytes()
    }
}

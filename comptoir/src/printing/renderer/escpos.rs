//! ESC/POS output for thermal printers
//!
//! Each page becomes one ticket. The lines are already laid out to the
//! paper width, so the renderer only adds emphasis and paper cuts.

use comptoir_printer::EscPosBuilder;

use super::PageRenderer;
use crate::printing::paginator::Page;
use crate::printing::sections::TOTAL_LABEL;

/// Lines fed before each cut so the last line clears the cutter
const CUT_FEED_LINES: u8 = 3;

/// Thermal ticket renderer
///
/// Emphasis is bold only: a size change would print taller rows than the
/// page geometry accounts for.
#[derive(Debug, Default)]
pub struct EscPosRenderer;

impl EscPosRenderer {
    pub fn new() -> Self {
        Self
    }

    fn render_page(&self, b: &mut EscPosBuilder, page: &Page) {
        b.left();
        // total label and the amount line below it
        let mut emphasis = 0;
        for line in page.lines() {
            if line.trim() == TOTAL_LABEL {
                emphasis = 2;
            }
            if emphasis > 0 {
                b.bold().line(line).bold_off();
                emphasis -= 1;
            } else {
                b.line(line.trim_end());
            }
        }
        b.cut_feed(CUT_FEED_LINES);
    }
}

impl PageRenderer for EscPosRenderer {
    fn render(&self, pages: &[Page]) -> Vec<u8> {
        let mut b = EscPosBuilder::new();
        for page in pages {
            self.render_page(&mut b, page);
        }
        b.build()
    }
}

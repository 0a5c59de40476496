//! Page breaking
//!
//! Lays a header, a run of item blocks and a footer onto fixed-height pages:
//!
//! - no block is ever split across two pages
//! - the header opens page 1, once
//! - the footer closes the last page, once, anchored to its bottom line
//! - items keep their order and each appears exactly once
//! - every page holds exactly `max_lines` lines (blank padding included)
//!
//! Page 1 is filled as densely as the header allows; the footer is kept
//! for the true last page. Pure and synchronous: no I/O, no logging.

use shared::models::PageGeometry;

use super::error::{BlockKind, LayoutError, LayoutResult};

/// Lines that must stay together on one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    lines: Vec<String>,
}

impl Block {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<Vec<String>> for Block {
    fn from(lines: Vec<String>) -> Self {
        Self::new(lines)
    }
}

/// One physical page of text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    lines: Vec<String>,
}

impl Page {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn push_block(&mut self, block: &Block) {
        self.lines.extend(block.lines.iter().cloned());
    }

    fn pad_to(&mut self, lines: usize) {
        self.lines.resize(lines, String::new());
    }
}

fn total_lines(blocks: &[Block]) -> usize {
    blocks.iter().map(Block::len).sum()
}

/// Break a receipt into pages
///
/// Fails before producing anything when the header and footer alone do not
/// fit on one page, or when an item block is taller than a whole page.
pub fn paginate(
    header: &Block,
    items: &[Block],
    footer: &Block,
    geometry: &PageGeometry,
) -> LayoutResult<Vec<Page>> {
    let max = geometry.max_lines();

    if header.len() + footer.len() > max {
        return Err(LayoutError::GeometryTooSmall {
            header: header.len(),
            footer: footer.len(),
            max_lines: max,
        });
    }
    if let Some((index, block)) = items.iter().enumerate().find(|(_, b)| b.len() > max) {
        return Err(LayoutError::BlockTooLarge {
            block: BlockKind::Item(index),
            required: block.len(),
            available: max,
        });
    }

    let mut first = Page::default();
    first.push_block(header);

    // Everything fits: one page, footer at the bottom edge
    if header.len() + total_lines(items) + footer.len() <= max {
        for item in items {
            first.push_block(item);
        }
        first.pad_to(max - footer.len());
        first.push_block(footer);
        return Ok(vec![first]);
    }

    let mut rest = items;
    while let Some(item) = rest.first() {
        if first.len() + item.len() > max {
            break;
        }
        first.push_block(item);
        rest = &rest[1..];
    }
    first.pad_to(max);

    let mut pages = vec![first];
    loop {
        let mut page = Page::default();

        if total_lines(rest) + footer.len() <= max {
            for item in rest {
                page.push_block(item);
            }
            page.pad_to(max - footer.len());
            page.push_block(footer);
            pages.push(page);
            return Ok(pages);
        }

        while let Some(item) = rest.first() {
            if page.len() + item.len() > max {
                break;
            }
            page.push_block(item);
            rest = &rest[1..];
        }
        page.pad_to(max);
        pages.push(page);
    }
}

//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS print data.

use crate::encoding::convert_to_cp1252;

/// ESC/POS command builder
///
/// Builds ESC/POS byte sequences for thermal printers. Lines are expected
/// to be laid out to the paper width already; the builder only adds
/// styling and paper control. All text is converted to Windows-1252 on
/// [`build`](Self::build).
pub struct EscPosBuilder {
    buf: Vec<u8>,
}

impl EscPosBuilder {
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(4096);
        // Initialize printer (ESC @)
        buf.extend_from_slice(&[0x1B, 0x40]);
        Self { buf }
    }

    // === Text Output ===

    /// Write raw text
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    // === Alignment ===

    /// Align text to left (default)
    pub fn left(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x00]);
        self
    }

    // === Text Style ===

    /// Enable bold text
    pub fn bold(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x01]);
        self
    }

    /// Disable bold text
    pub fn bold_off(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x00]);
        self
    }

    // === Paper Control ===

    /// Full cut with feed, feeds n lines then cuts.
    /// Uses GS V 66 n, which lets the printer manage cutter-to-head distance.
    pub fn cut_feed(&mut self, lines: u8) -> &mut Self {
        // GS V 66 n - Full cut after feeding n lines
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x42, lines]);
        self
    }

    // === Build ===

    /// Build the final byte buffer with Windows-1252 encoding
    ///
    /// This converts all UTF-8 text while preserving ESC/POS commands.
    pub fn build(self) -> Vec<u8> {
        convert_to_cp1252(&self.buf)
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_basic() {
        let mut b = EscPosBuilder::new();
        b.left()
            .bold()
            .line("TOTAL A PAYER")
            .bold_off()
            .line("Reçu");

        let data = b.build();
        assert_eq!(&data[..3], &[0x1B, 0x74, 16]);
        // ESC @ then the code page again
        assert_eq!(&data[3..8], &[0x1B, 0x40, 0x1B, 0x74, 16]);
        assert!(data.windows(4).any(|w| w == b"Re\xE7u"));
        assert!(
            data.windows(17)
                .any(|w| w == b"\x1B\x45\x01TOTAL A PAYER\n".as_slice())
        );
    }

    #[test]
    fn test_cut_feed() {
        let mut b = EscPosBuilder::new();
        b.line("x").cut_feed(3);
        let data = b.build();
        assert!(data.ends_with(&[b'x', b'\n', 0x1D, 0x56, 0x42, 3]));
    }
}

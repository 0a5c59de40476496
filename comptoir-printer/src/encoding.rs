//! Windows-1252 encoding for Latin thermal printers
//!
//! Receipts are written in French, so accented Latin characters must reach
//! the printer in a single-byte code page. ESC/POS printers expose
//! Windows-1252 as character code table 16 (`ESC t 16`).
//!
//! This module provides utilities for:
//! - Encoding text to Windows-1252 with a `?` fallback
//! - Converting UTF-8 content to Windows-1252 while preserving ESC/POS commands

use tracing::instrument;

/// ESC t 16 - select the WPC1252 character code table
const SELECT_CP1252: [u8; 3] = [0x1B, 0x74, 16];

/// Byte written for characters Windows-1252 cannot represent
const REPLACEMENT: u8 = b'?';

/// Encode a string to Windows-1252
///
/// Characters outside the code page become `?` so every character maps to
/// exactly one byte and column widths stay intact.
pub fn encode_cp1252(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    let mut tmp = [0u8; 4];
    for c in s.chars() {
        if c.is_ascii() {
            out.push(c as u8);
            continue;
        }
        let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(c.encode_utf8(&mut tmp));
        if had_errors || bytes.len() != 1 {
            out.push(REPLACEMENT);
        } else {
            out.push(bytes[0]);
        }
    }
    out
}

/// Convert mixed UTF-8 content (with ESC/POS commands) to Windows-1252
///
/// ASCII bytes (0x00-0x7F) are copied as is, which protects ESC/POS
/// commands from being corrupted. Only bytes >= 0x80 are treated as UTF-8
/// sequences and re-encoded.
///
/// The code page is selected at the start and again after every INIT
/// command (ESC @), which resets it.
#[instrument(skip(bytes), fields(len = bytes.len()))]
pub fn convert_to_cp1252(bytes: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(bytes.len() + SELECT_CP1252.len());
    result.extend_from_slice(&SELECT_CP1252);

    let mut buffer = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if b == 0x1B && bytes.get(i + 1) == Some(&0x40) {
            flush_buffer(&mut buffer, &mut result);
            result.extend_from_slice(&[0x1B, 0x40]);
            result.extend_from_slice(&SELECT_CP1252);
            i += 2;
            continue;
        }

        if b < 128 {
            flush_buffer(&mut buffer, &mut result);
            result.push(b);
        } else {
            buffer.push(b);
        }
        i += 1;
    }

    flush_buffer(&mut buffer, &mut result);
    result
}

/// Flush the non-ASCII buffer, converting UTF-8 to Windows-1252
fn flush_buffer(buffer: &mut Vec<u8>, result: &mut Vec<u8>) {
    if buffer.is_empty() {
        return;
    }
    let s = String::from_utf8_lossy(buffer);
    result.extend_from_slice(&encode_cp1252(&s));
    buffer.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_accents() {
        assert_eq!(encode_cp1252("Espèces"), b"Esp\xE8ces".to_vec());
        assert_eq!(encode_cp1252("Reçu €"), b"Re\xE7u \x80".to_vec());
    }

    #[test]
    fn test_unmappable_becomes_question_mark() {
        assert_eq!(encode_cp1252("a中b"), b"a?b".to_vec());
        assert_eq!(encode_cp1252("€中"), b"\x80?".to_vec());
    }

    #[test]
    fn test_convert_preserves_commands() {
        let input = "\x1B\x61\x01Thé\n\x1B@é".as_bytes();
        let out = convert_to_cp1252(input);
        assert_eq!(&out[..3], &SELECT_CP1252);
        assert_eq!(
            &out[3..],
            b"\x1B\x61\x01Th\xE9\n\x1B@\x1B\x74\x10\xE9".as_slice()
        );
    }
}

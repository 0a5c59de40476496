//! Fixed-width line primitives
//!
//! Every receipt line goes through these helpers. Widths and lengths are
//! counted in characters, not bytes, so accented French text lines up on
//! single-byte printer code pages.

use super::error::TextError;

/// Number of characters in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// First `n` characters of `text`
pub fn take_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Center `text` in a field of `width` columns
///
/// Text longer than `width` is returned unmodified; callers truncate first.
/// When the padding is odd the extra space goes to the right.
pub fn pad_center(text: &str, width: usize) -> String {
    let len = char_len(text);
    if len >= width {
        return text.to_string();
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Place `left` flush left and `right` flush right on one line of `width`
///
/// When both do not fit with a separating space, the longer operand loses
/// characters from its end (the right one on a tie) until the pair occupies
/// `width - 1` columns. Truncation never makes the longer operand shorter
/// than the other one; past that point both shrink in turn.
///
/// The result is always exactly `width` characters.
pub fn side_by_side(left: &str, right: &str, width: usize) -> String {
    let mut l = char_len(left);
    let mut r = char_len(right);

    if l + r < width {
        let gap = width - l - r;
        return format!("{}{}{}", left, " ".repeat(gap), right);
    }

    let budget = width.saturating_sub(1);
    while l + r > budget {
        if l > r {
            l -= 1;
        } else {
            r -= 1;
        }
    }
    let mut line = format!("{} {}", take_chars(left, l), take_chars(right, r));
    // width 0: nothing fits, not even the separator
    if width == 0 {
        line.clear();
    }
    line
}

/// Shorten `text` to `max_len` characters, ending it with `...`
///
/// `max_len` below 4 cannot hold one character plus the ellipsis and is
/// rejected.
pub fn truncate_with_ellipsis(text: &str, max_len: usize) -> Result<String, TextError> {
    if max_len < 4 {
        return Err(TextError::BudgetTooSmall(max_len));
    }
    if char_len(text) <= max_len {
        return Ok(text.to_string());
    }
    Ok(format!("{}...", take_chars(text, max_len - 3)))
}

/// `fill` repeated `width` times
pub fn separator_line(width: usize, fill: char) -> String {
    std::iter::repeat_n(fill, width).collect()
}

/// Word-wrap `text` onto exactly `lines` lines of at most `width` columns
///
/// Words longer than a line are cut. If the text needs more lines than
/// available, the last line ends with `...`. Missing lines are blank.
pub fn wrap_fixed(text: &str, width: usize, lines: usize) -> Result<Vec<String>, TextError> {
    if width < 4 {
        return Err(TextError::BudgetTooSmall(width));
    }

    let mut wrapped: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let word = take_chars(word, width);
        if current.is_empty() {
            current.push_str(word);
        } else if char_len(&current) + 1 + char_len(word) <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            wrapped.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        wrapped.push(current);
    }

    if wrapped.len() > lines {
        wrapped.truncate(lines);
        if let Some(last) = wrapped.last_mut() {
            let shortened = take_chars(last, width - 3).trim_end().to_string();
            *last = format!("{shortened}...");
        }
    }
    wrapped.resize(lines, String::new());
    Ok(wrapped)
}

//! Layout error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Text primitive errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("ellipsis truncation needs at least 4 columns, got {0}")]
    BudgetTooSmall(usize),
}

/// Which block of a receipt failed to fit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Header,
    Item(usize),
    Footer,
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockKind::Header => f.write_str("header"),
            BlockKind::Item(i) => write!(f, "item #{}", i + 1),
            BlockKind::Footer => f.write_str("footer"),
        }
    }
}

/// Layout configuration errors
///
/// Raised before any page is produced; a failed layout yields no output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error(
        "page of {max_lines} lines cannot hold the header ({header} lines) and footer ({footer} lines)"
    )]
    GeometryTooSmall {
        header: usize,
        footer: usize,
        max_lines: usize,
    },

    #[error("{block} needs {required} lines but only {available} are available on a page")]
    BlockTooLarge {
        block: BlockKind,
        required: usize,
        available: usize,
    },

    #[error(transparent)]
    Text(#[from] TextError),
}

pub type LayoutResult<T> = Result<T, LayoutError>;

impl From<TextError> for AppError {
    fn from(err: TextError) -> Self {
        AppError::with_message(ErrorCode::TextBudgetTooSmall, err.to_string())
    }
}

impl From<LayoutError> for AppError {
    fn from(err: LayoutError) -> Self {
        let message = err.to_string();
        match err {
            LayoutError::GeometryTooSmall {
                header,
                footer,
                max_lines,
            } => AppError::with_message(ErrorCode::GeometryTooSmall, message)
                .with_detail("header_lines", header as u64)
                .with_detail("footer_lines", footer as u64)
                .with_detail("max_lines", max_lines as u64),
            LayoutError::BlockTooLarge {
                block,
                required,
                available,
            } => AppError::with_message(ErrorCode::BlockTooLarge, message)
                .with_detail("block", block.to_string())
                .with_detail("required", required as u64)
                .with_detail("available", available as u64),
            LayoutError::Text(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_too_large_details() {
        let err: AppError = LayoutError::BlockTooLarge {
            block: BlockKind::Item(4),
            required: 2,
            available: 1,
        }
        .into();
        assert_eq!(err.code, ErrorCode::BlockTooLarge);
        assert_eq!(err.detail("block").and_then(|v| v.as_str()), Some("item #5"));
        assert_eq!(err.detail("required").and_then(|v| v.as_u64()), Some(2));
    }
}

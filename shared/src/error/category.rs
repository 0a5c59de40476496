//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Receipt errors (1xxx)
    Receipt,
    /// Layout errors (2xxx)
    Layout,
    /// Product errors (3xxx)
    Product,
    /// Printer errors (4xxx)
    Printer,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Receipt,
            2000..3000 => Self::Layout,
            3000..4000 => Self::Product,
            4000..5000 => Self::Printer,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Receipt => "receipt",
            Self::Layout => "layout",
            Self::Product => "product",
            Self::Printer => "printer",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Receipt);
        assert_eq!(ErrorCategory::from_code(2002), ErrorCategory::Layout);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Product);
        assert_eq!(ErrorCategory::from_code(4004), ErrorCategory::Printer);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::NotFound.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::ReceiptEmpty.category(), ErrorCategory::Receipt);
        assert_eq!(ErrorCode::BlockTooLarge.category(), ErrorCategory::Layout);
        assert_eq!(ErrorCode::PrintFailed.category(), ErrorCategory::Printer);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_name() {
        assert_eq!(ErrorCategory::Layout.name(), "layout");
        assert_eq!(ErrorCategory::Printer.name(), "printer");
    }
}

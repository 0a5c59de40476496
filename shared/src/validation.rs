//! Input validation helpers
//!
//! Centralized text length constants and validation functions applied at
//! the boundary, before any receipt reaches storage or layout.

use rust_decimal::Decimal;

use crate::error::{AppError, AppResult, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Product names
pub const MAX_NAME_LEN: usize = 200;

/// Client name, payment method
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Client contact block (phone, address lines)
pub const MAX_CONTACT_LEN: usize = 300;

/// Free-text notes
pub const MAX_NOTE_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        )
        .with_detail("field", field));
    }
    validate_optional_text(value, field, max_len)
}

/// Validate that a string, possibly empty, is within the length limit.
pub fn validate_optional_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate a line item quantity (strictly positive, fractions allowed)
pub fn validate_quantity(quantity: Decimal) -> AppResult<()> {
    if quantity <= Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidQuantity,
            format!("quantity must be positive, got {quantity}"),
        )
        .with_detail("field", "quantity"));
    }
    Ok(())
}

/// Validate a unit price (strictly positive)
pub fn validate_price(price: Decimal) -> AppResult<()> {
    if price <= Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            format!("unit price must be positive, got {price}"),
        )
        .with_detail("field", "unit_price"));
    }
    Ok(())
}

//! Locale-stable number and date formatting

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Thousands separator, fixed regardless of the host locale
const THOUSANDS_SEP: char = ',';

/// Format an amount as a grouped integer: `1234567.5` → `1,234,568`
///
/// Rounds half to even, like the receipts printed so far.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(THOUSANDS_SEP);
        }
        grouped.push(c);
    }
    grouped
}

/// Format a quantity: whole numbers grouped like amounts, fractions with
/// up to two decimals (`2.5`, `0.75`)
pub fn format_quantity(quantity: Decimal) -> String {
    if quantity.fract().is_zero() {
        return format_amount(quantity);
    }
    quantity
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
        .normalize()
        .to_string()
}

/// `YYYY-MM-DD` → `DD/MM/YYYY`; anything else is printed as given
pub fn format_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

//! Amounts in French words
//!
//! `12500 Ar` → `Douze mille cinq cents Ariary`. Traditional spelling:
//! hyphens below one hundred, `et` for 21..71, `cents`/`vingts` plural only
//! at the end of a number or before `millions`/`milliards`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const UNITS: [&str; 17] = [
    "zéro", "un", "deux", "trois", "quatre", "cinq", "six", "sept", "huit", "neuf", "dix", "onze",
    "douze", "treize", "quatorze", "quinze", "seize",
];

const TENS: [&str; 7] = ["", "", "vingt", "trente", "quarante", "cinquante", "soixante"];

fn below_100(n: u64, plural: bool) -> String {
    debug_assert!(n < 100);
    if n <= 16 {
        return UNITS[n as usize].to_string();
    }
    if n < 20 {
        return format!("dix-{}", UNITS[(n - 10) as usize]);
    }
    let (tens, unit) = (n / 10, n % 10);
    match tens {
        2..=6 => match unit {
            0 => TENS[tens as usize].to_string(),
            1 => format!("{} et un", TENS[tens as usize]),
            _ => format!("{}-{}", TENS[tens as usize], UNITS[unit as usize]),
        },
        7 if unit == 1 => "soixante et onze".to_string(),
        7 => format!("soixante-{}", below_100(10 + unit, plural)),
        8 if unit == 0 => (if plural { "quatre-vingts" } else { "quatre-vingt" }).to_string(),
        8 => format!("quatre-vingt-{}", UNITS[unit as usize]),
        _ => format!("quatre-vingt-{}", below_100(10 + unit, plural)),
    }
}

fn below_1000(n: u64, plural: bool) -> String {
    debug_assert!(n < 1000);
    let (hundreds, rest) = (n / 100, n % 100);
    match (hundreds, rest) {
        (0, _) => below_100(rest, plural),
        (1, 0) => "cent".to_string(),
        (1, _) => format!("cent {}", below_100(rest, plural)),
        (_, 0) if plural => format!("{} cents", UNITS[hundreds as usize]),
        (_, 0) => format!("{} cent", UNITS[hundreds as usize]),
        (_, _) => format!("{} cent {}", UNITS[hundreds as usize], below_100(rest, plural)),
    }
}

fn count(n: u64) -> String {
    if n < 1000 {
        below_1000(n, true)
    } else {
        number_to_words(n)
    }
}

/// Spell out a non-negative integer in French
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return UNITS[0].to_string();
    }

    let milliards = n / 1_000_000_000;
    let millions = (n / 1_000_000) % 1000;
    let thousands = (n / 1000) % 1000;
    let rest = n % 1000;

    let mut parts: Vec<String> = Vec::new();
    match milliards {
        0 => {}
        1 => parts.push("un milliard".to_string()),
        m => parts.push(format!("{} milliards", count(m))),
    }
    match millions {
        0 => {}
        1 => parts.push("un million".to_string()),
        m => parts.push(format!("{} millions", below_1000(m, true))),
    }
    match thousands {
        0 => {}
        1 => parts.push("mille".to_string()),
        t => parts.push(format!("{} mille", below_1000(t, false))),
    }
    if rest > 0 {
        parts.push(below_1000(rest, true));
    }
    parts.join(" ")
}

/// Currency word printed after the amount
pub fn currency_word(symbol: &str) -> &str {
    match symbol.trim() {
        "Ar" | "MGA" => "Ariary",
        "€" | "EUR" => "euros",
        other => other,
    }
}

/// Total in words with its currency, first letter capitalised
///
/// The amount is rounded to a whole number first, the same way it is
/// printed in figures.
pub fn amount_in_words(amount: Decimal, currency: &str) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    let value = rounded.abs().to_u64().unwrap_or(u64::MAX);

    let mut text = number_to_words(value);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        text = format!("moins {text}");
    }
    let word = currency_word(currency);
    if !word.is_empty() {
        text.push(' ');
        text.push_str(word);
    }

    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => text,
    }
}

//! Lenient decimal parsing for display-formatted numbers.
//!
//! Market pages print values for humans: `$1,234.56`, `0.45%`, `−2.10%`.
//! Uses `rust_decimal` so price comparisons are exact rather than subject to
//! floating-point rounding.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Currency symbols accepted (and ignored) in front of an amount.
const CURRENCY_SYMBOLS: [char; 4] = ['$', '€', '£', '¥'];

/// Parse a display-formatted number into a `Decimal`.
///
/// Accepts surrounding whitespace, currency symbols, thousands separators,
/// a trailing percent sign, a leading `+` and both ASCII and Unicode minus
/// signs. Anything else (letters, magnitude suffixes, subscript digits)
/// yields `None`.
pub fn parse_display_decimal(text: &str) -> Option<Decimal> {
    let mut digits = String::with_capacity(text.len());
    let mut negative = false;

    for ch in text.trim().chars() {
        match ch {
            '0'..='9' | '.' => digits.push(ch),
            '-' | '\u{2212}' if digits.is_empty() && !negative => negative = true,
            '+' if digits.is_empty() => {}
            ',' | '%' => {}
            c if c.is_whitespace() => {}
            c if CURRENCY_SYMBOLS.contains(&c) => {}
            _ => return None,
        }
    }

    if digits.is_empty() {
        return None;
    }

    let value = Decimal::from_str(&digits).ok()?;
    Some(if negative { -value } else { value })
}

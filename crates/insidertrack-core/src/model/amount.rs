//! Parsing of captured numeric strings.
//!
//! The source renders numbers with thousands separators and currency-tagged
//! totals (`"1,234,567 SEK"`). These strings are stored verbatim; parsing is
//! only needed to derive a unit price.

use rust_decimal::Decimal;
use std::str::FromStr;

/// A parsed amount with its currency code, if one was attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    pub value: Decimal,
    pub currency: Option<String>,
}

/// Parse a captured numeric string.
///
/// Commas, spaces and non-breaking spaces are treated as thousands
/// separators. A run of ASCII letters before or after the number is taken as
/// the currency code. Returns `None` for anything else.
pub fn parse_amount(raw: &str) -> Option<Amount> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (number, currency) = split_currency(trimmed);
    let cleaned: String = number
        .chars()
        .filter(|c| !matches!(c, ',' | ' ' | '\u{a0}' | '\u{202f}'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let value = Decimal::from_str(&cleaned).ok()?;
    Some(Amount {
        value,
        currency: currency.map(|c| c.to_ascii_uppercase()),
    })
}

fn split_currency(s: &str) -> (&str, Option<&str>) {
    let leading = s.chars().take_while(|c| c.is_ascii_alphabetic()).count();
    if leading > 0 {
        return (s[leading..].trim(), Some(&s[..leading]));
    }

    let trailing = s
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_alphabetic())
        .count();
    if trailing > 0 {
        let split = s.len() - trailing;
        return (s[..split].trim(), Some(&s[split..]));
    }

    (s, None)
}

//! Numeric parsing for scraped text values.
//!
//! Pages print numbers for humans: currency signs, thousands separators,
//! magnitude suffixes and percent signs. Unparseable or placeholder text
//! ("n/a", "-") yields `None`, never zero.

use std::str::FromStr;

use rust_decimal::Decimal;

fn is_placeholder(raw: &str) -> bool {
    let lower = raw.to_ascii_lowercase();
    matches!(lower.as_str(), "" | "n/a" | "na" | "-" | "--")
}

fn simple_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Parse a scalar value: strips `$`, thousands separators and a trailing
/// `%`; a trailing `K`/`M`/`B`/`T` multiplies by 10^3/10^6/10^9/10^12.
pub fn parse_numeric(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if is_placeholder(trimmed) {
        return None;
    }

    let mut body = trimmed.trim_end_matches('%').trim_end();
    let mut multiplier = Decimal::ONE;
    if let Some(last) = body.chars().last() {
        let scale = match last.to_ascii_uppercase() {
            'K' => Some(Decimal::from(1_000_i64)),
            'M' => Some(Decimal::from(1_000_000_i64)),
            'B' => Some(Decimal::from(1_000_000_000_i64)),
            'T' => Some(Decimal::from(1_000_000_000_000_i64)),
            _ => None,
        };
        if let Some(scale) = scale {
            multiplier = scale;
            body = &body[..body.len() - last.len_utf8()];
        }
    }

    simple_decimal(body).map(|value| value * multiplier)
}

/// Parse a percent value, isolating the `%`-bearing token when the cell
/// mixes absolute and relative change ("+1.25 (0.64%)"). No magnitude
/// suffixes apply.
pub fn parse_percent(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if is_placeholder(trimmed) {
        return None;
    }

    let Some(idx) = trimmed.rfind('%') else {
        return simple_decimal(trimmed);
    };

    let head = &trimmed[..idx];
    let token: String = head
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | ','))
        .collect::<String>()
        .chars()
        .rev()
        .collect();
    simple_decimal(&token)
}

//! Decimal input normalisation and amount formatting.
//!
//! User text goes through [`normalize_decimal`] before it reaches the parser, so both
//! `12,50` and `€ 12.50` end up as `12.50`. Parsing is lenient in the same way a
//! browser `parseFloat` is: the longest numeric prefix wins and trailing garbage is
//! ignored. A string with no numeric prefix is "not a number" and yields `None`.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

pub const DEFAULT_CURRENCY_SYMBOL: &str = "€";

/// Strips everything outside `[0-9.,-]` and turns the first `,` into `.`.
pub fn normalize_decimal(input: &str) -> String {
    let kept: String = input
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, '.' | ',' | '-'))
        .collect();
    kept.replacen(',', ".", 1)
}

/// Normalises `input` and parses its numeric prefix.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    parse_numeric_prefix(&normalize_decimal(input))
}

/// Like [`parse_amount`] but treats "not a number" as zero, for running sums.
pub fn amount_or_zero(input: &str) -> Decimal {
    parse_amount(input).unwrap_or(Decimal::ZERO)
}

/// Formats an amount with two decimals followed by the currency symbol.
pub fn format_amount(value: Decimal, symbol: &str) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2} {}", rounded, symbol)
}

/// Sums `values`, or `None` once the running total leaves the `Decimal` range.
pub fn checked_sum<I: IntoIterator<Item = Decimal>>(values: I) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(value))
}

/// Sums `values`, clamping at `Decimal::MIN` and `Decimal::MAX`.
pub fn saturating_sum<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |total, value| total.saturating_add(value))
}

fn parse_numeric_prefix(raw: &str) -> Option<Decimal> {
    let mut chars = raw.chars().peekable();
    let mut negative = false;
    if chars.peek() == Some(&'-') {
        negative = true;
        chars.next();
    }

    let mut int_part = String::new();
    while let Some(ch) = chars.peek().copied() {
        if ch.is_ascii_digit() {
            int_part.push(ch);
            chars.next();
        } else {
            break;
        }
    }

    let mut frac_part = String::new();
    if chars.peek() == Some(&'.') {
        chars.next();
        while let Some(ch) = chars.peek().copied() {
            if ch.is_ascii_digit() {
                frac_part.push(ch);
                chars.next();
            } else {
                break;
            }
        }
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut canonical = String::with_capacity(int_part.len() + frac_part.len() + 3);
    if negative {
        canonical.push('-');
    }
    if int_part.is_empty() {
        canonical.push('0');
    } else {
        canonical.push_str(&int_part);
    }
    if !frac_part.is_empty() {
        canonical.push('.');
        canonical.push_str(&frac_part);
    }
    Decimal::from_str(&canonical).ok()
}

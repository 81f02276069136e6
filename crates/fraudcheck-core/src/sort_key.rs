//! Sort keys parsed from displayed cell text.
//!
//! The monetary column is compared numerically after reading a number back
//! out of its display form ("R$ 1.234,56" → 1234.56), the date column as a
//! calendar date, and everything else as case-sensitive text.
//!
//! Text that cannot be parsed as a number or date yields an empty key, which
//! sorts before every parsed key and equal to other empty keys, keeping the
//! comparison a total order.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::column::ColumnKind;

const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%Y/%m/%d"];

#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Text(String),
    Number(Option<f64>),
    Date(Option<NaiveDate>),
}

impl SortKey {
    /// Build the key for a displayed cell of the given column kind.
    pub fn from_display(kind: ColumnKind, text: &str) -> Self {
        match kind {
            ColumnKind::Text => SortKey::Text(text.trim().to_string()),
            ColumnKind::Monetary => SortKey::Number(parse_monetary(text)),
            ColumnKind::Date => SortKey::Date(parse_date(text)),
        }
    }

    /// Three-way comparison. Keys of different variants compare equal; a
    /// column always produces a single variant.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => compare_parsed(a, b, f64::total_cmp),
            (SortKey::Date(a), SortKey::Date(b)) => compare_parsed(a, b, NaiveDate::cmp),
            _ => Ordering::Equal,
        }
    }
}

fn compare_parsed<T>(a: &Option<T>, b: &Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}

/// Read a number back out of a Brazilian-formatted money string.
///
/// Keeps only digits, commas and minus signs, turns the first comma into a
/// decimal point, then reads the longest numeric prefix. Thousands dots are
/// discarded along with the currency symbol.
pub fn parse_monetary(text: &str) -> Option<f64> {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '-')
        .collect();
    let normalised = kept.replacen(',', ".", 1);
    leading_number(&normalised)
}

/// Longest prefix of the form `-?digits(.digits)?`, parsed as f64.
fn leading_number(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            has_digits = true;
            end = frac_end;
        } else if has_digits {
            end += 1;
        }
    }
    if !has_digits {
        return None;
    }
    s[..end].parse().ok()
}

/// Parse a displayed date. Accepts day-first and ISO forms; a trailing time
/// part ("05/03/2024 14:30") is ignored.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    let date_part = trimmed.split_whitespace().next().unwrap_or(trimmed);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

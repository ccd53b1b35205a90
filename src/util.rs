// Utility helpers for value parsing and basic statistics.
//
// This module centralizes the "dirty" string/number handling so the rest of
// the code can assume clean, typed values.
use num_format::{Locale, ToFormattedString};

/// Clean a raw percentage-change cell and parse it as `f64`.
///
/// The statistics export renders changes in several shapes (`-3.1`,
/// `12.3%`, `1,234`, footnote markers), so the value is scrubbed before
/// parsing:
/// - trims whitespace,
/// - strips a trailing percent sign,
/// - strips thousands-separator commas,
/// - removes any remaining character that is not a digit, a period, or a
///   minus sign.
///
/// Returns `None` for anything that still fails to parse. Callers keep the
/// row and record the cell as missing rather than aborting.
pub fn parse_change_pct(s: &str) -> Option<f64> {
    let s = s.trim();
    let s = s.strip_suffix('%').unwrap_or(s);
    let s = s.replace(',', "");
    let s: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok()
}

pub fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

pub fn parse_price(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i64>().ok()
}

/// Median of a list of numbers; 0 for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    // `partial_cmp` with an equality fallback keeps NaNs from panicking.
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Render a price cell for the year-by-item tables.
///
/// Estimated prices are whole-valued after rounding but stay float-typed,
/// so cells keep one decimal place (`91.0`).
pub fn format_price(price: f64) -> String {
    format!("{:.1}", price)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values, used for
    // row counts in console messages (e.g., `12,345 rows read`).
    n.to_formatted_string(&Locale::en)
}

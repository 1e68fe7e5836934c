//! Lenient numeric parsing for feed values and operator input
//!
//! Feed nodes carry numbers either as JSON numbers or as strings such as
//! `"150"` or `"12.5 kW"`. A value counts as numeric when its longest leading
//! decimal prefix parses to a finite number.

use serde_json::Value;

/// Parse the longest leading decimal number of `text`.
///
/// Leading whitespace is skipped, trailing garbage is ignored, and
/// non-finite results (`"Infinity"`, overflow) are rejected.
pub fn parse_float(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    trimmed[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Numeric reading of a feed value, if it has one
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|v| v.is_finite()),
        Value::String(text) => parse_float(text),
        _ => None,
    }
}

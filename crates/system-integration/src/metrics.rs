//! Per-stage metric list

use clinker_shared::{numeric_value, MeasurementNode};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

static WORD_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w").expect("word start pattern is valid"));

/// One rendered metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricEntry {
    pub label: String,
    pub value: String,
}

/// `kiln_inlet_temp` -> `Kiln Inlet Temp`
pub fn format_label(key: &str) -> String {
    let spaced = key.replace('_', " ");
    WORD_START
        .replace_all(&spaced, |caps: &regex::Captures| caps[0].to_uppercase())
        .into_owned()
}

/// Numbers (and numeric strings) with one decimal, anything else verbatim
pub fn format_value(value: &Value) -> String {
    match numeric_value(value) {
        Some(number) => format!("{:.1}", round_half_up_tenths(number)),
        None => match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        },
    }
}

/// `{:.1}` rounds exact ties to even; the dashboard rounds them away from zero.
/// A binary float sits exactly halfway between tenths only when `4 * x` is odd.
fn round_half_up_tenths(number: f64) -> f64 {
    let quarters = number * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        (number * 10.0).round() / 10.0
    } else {
        number
    }
}

/// First `count` non-`Time` fields in insertion order
pub fn metric_entries(node: &MeasurementNode, count: usize) -> Vec<MetricEntry> {
    node.measurements()
        .take(count)
        .map(|(key, value)| MetricEntry {
            label: format_label(key),
            value: format_value(value),
        })
        .collect()
}

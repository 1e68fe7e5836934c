//! Common data types used across the system

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field name carrying the sample time inside a measurement node
pub const TIME_FIELD: &str = "Time";

pub const DEFAULT_ALERT_TITLE: &str = "Alert";
pub const DEFAULT_ALERT_MESSAGE: &str = "No message available";

/// Per-stage measurement snapshot, replaced wholesale on every push.
///
/// Field order is the order the feed delivered them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasurementNode {
    fields: Map<String, Value>,
}

impl MeasurementNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a node from a feed value. Only JSON objects are nodes.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(|fields| Self {
            fields: fields.clone(),
        })
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// The optional `Time` field, when it is a string
    pub fn time(&self) -> Option<&str> {
        self.fields.get(TIME_FIELD).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All fields in insertion order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Fields other than `Time`, in insertion order
    pub fn measurements(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields().filter(|(key, _)| *key != TIME_FIELD)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A named numeric reading picked out of a measurement node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericField {
    pub key: String,
    pub value: f64,
}

/// One point of a stage's rolling chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Alert severity as delivered by the feed. Unknown severities are kept
/// verbatim so they still map to an `alert-<severity>` style.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertSeverity {
    #[default]
    Info,
    Warning,
    Critical,
    Other(String),
}

impl AlertSeverity {
    pub fn as_str(&self) -> &str {
        match self {
            AlertSeverity::Info => "info",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Critical => "critical",
            AlertSeverity::Other(other) => other,
        }
    }
}

impl From<String> for AlertSeverity {
    fn from(value: String) -> Self {
        match value.as_str() {
            "info" => AlertSeverity::Info,
            "warning" => AlertSeverity::Warning,
            "critical" => AlertSeverity::Critical,
            _ => AlertSeverity::Other(value),
        }
    }
}

impl From<AlertSeverity> for String {
    fn from(value: AlertSeverity) -> Self {
        value.as_str().to_string()
    }
}

/// Active alert record. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<AlertSeverity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

impl Alert {
    /// Decode a feed record field by field. Mistyped or empty fields fall
    /// back to their defaults; a non-object record is all defaults.
    pub fn from_value(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::default();
        };
        Self {
            severity: text_field(fields.get("severity")).map(AlertSeverity::from),
            title: text_field(fields.get("title")),
            message: text_field(fields.get("message")),
            timestamp: fields.get("timestamp").and_then(Value::as_f64),
        }
    }

    /// Severity, defaulting to `info`
    pub fn severity(&self) -> AlertSeverity {
        self.severity
            .clone()
            .filter(|severity| !severity.as_str().is_empty())
            .unwrap_or_default()
    }

    pub fn title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(DEFAULT_ALERT_TITLE)
    }

    pub fn message(&self) -> &str {
        self.message
            .as_deref()
            .filter(|message| !message.is_empty())
            .unwrap_or(DEFAULT_ALERT_MESSAGE)
    }

    /// Zero counts as no timestamp
    pub fn timestamp_millis(&self) -> Option<i64> {
        self.timestamp
            .filter(|ts| ts.is_finite() && *ts != 0.0)
            .map(|ts| ts as i64)
    }
}

/// Display text of a scalar field; empty, zero, false and null are absent
fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_preserves_order() {
        let value = json!({"Time": "10:00", "Zeta": 1, "Alpha": 2});
        let node = MeasurementNode::from_value(&value).unwrap();
        let keys: Vec<&str> = node.fields().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Time", "Zeta", "Alpha"]);
        assert_eq!(node.time(), Some("10:00"));

        let measured: Vec<&str> = node.measurements().map(|(k, _)| k).collect();
        assert_eq!(measured, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_node_requires_object() {
        assert!(MeasurementNode::from_value(&json!(42)).is_none());
        assert!(MeasurementNode::from_value(&json!(null)).is_none());
    }

    #[test]
    fn test_alert_defaults() {
        let alert: Alert = serde_json::from_value(json!({})).unwrap();
        assert_eq!(alert.severity(), AlertSeverity::Info);
        assert_eq!(alert.title(), DEFAULT_ALERT_TITLE);
        assert_eq!(alert.message(), DEFAULT_ALERT_MESSAGE);
        assert_eq!(alert.timestamp_millis(), None);
    }

    #[test]
    fn test_alert_fields() {
        let alert: Alert = serde_json::from_value(json!({
            "severity": "critical",
            "title": "Kiln overheat",
            "message": "Shell temperature above limit",
            "timestamp": 1_700_000_000_000u64
        }))
        .unwrap();
        assert_eq!(alert.severity(), AlertSeverity::Critical);
        assert_eq!(alert.title(), "Kiln overheat");
        assert_eq!(alert.timestamp_millis(), Some(1_700_000_000_000));
    }

    #[test]
    fn test_unknown_severity_kept() {
        let alert: Alert = serde_json::from_value(json!({"severity": "maintenance"})).unwrap();
        assert_eq!(alert.severity().as_str(), "maintenance");
    }

    #[test]
    fn test_null_fields_are_absent() {
        let alert: Alert =
            serde_json::from_value(json!({"severity": null, "title": null})).unwrap();
        assert_eq!(alert.severity(), AlertSeverity::Info);
        assert_eq!(alert.title(), DEFAULT_ALERT_TITLE);
    }

    #[test]
    fn test_empty_and_zero_fall_back() {
        let alert: Alert = serde_json::from_value(json!({
            "severity": "",
            "title": "",
            "message": "",
            "timestamp": 0
        }))
        .unwrap();
        assert_eq!(alert.severity(), AlertSeverity::Info);
        assert_eq!(alert.title(), DEFAULT_ALERT_TITLE);
        assert_eq!(alert.message(), DEFAULT_ALERT_MESSAGE);
        assert_eq!(alert.timestamp_millis(), None);
    }

    #[test]
    fn test_from_value_is_lenient() {
        let alert = Alert::from_value(&json!({
            "severity": ["warning"],
            "title": 42,
            "message": {"text": "nested"},
            "timestamp": "yesterday"
        }));
        assert_eq!(alert.severity(), AlertSeverity::Info);
        assert_eq!(alert.title(), "42");
        assert_eq!(alert.message(), DEFAULT_ALERT_MESSAGE);
        assert_eq!(alert.timestamp_millis(), None);

        let alert = Alert::from_value(&json!({"severity": "critical", "timestamp": 1_700_000_000_000u64}));
        assert_eq!(alert.severity(), AlertSeverity::Critical);
        assert_eq!(alert.timestamp_millis(), Some(1_700_000_000_000));

        assert_eq!(Alert::from_value(&json!("oops")), Alert::default());
        assert_eq!(Alert::from_value(&json!(null)), Alert::default());
    }
}

//! Active alert list rendering

use chrono::{DateTime, FixedOffset};
use clinker_shared::Alert;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Reverse;

/// One alert ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedAlert {
    pub id: String,
    /// `alert-item alert-<severity>`
    pub class: String,
    pub title: String,
    pub message: String,
    /// `HH:MM`, omitted without a timestamp
    pub time: Option<String>,
}

impl RenderedAlert {
    pub fn new(id: impl Into<String>, alert: &Alert, offset: &FixedOffset) -> Self {
        Self {
            id: id.into(),
            class: format!("alert-item alert-{}", alert.severity().as_str()),
            title: alert.title().to_string(),
            message: alert.message().to_string(),
            time: alert
                .timestamp_millis()
                .and_then(DateTime::from_timestamp_millis)
                .map(|at| at.with_timezone(offset).format("%H:%M").to_string()),
        }
    }
}

/// Full replacement content for the alert list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum AlertListing {
    Placeholder(String),
    Items(Vec<RenderedAlert>),
}

/// Build the alert list from an alerts snapshot keyed by alert id.
///
/// Newest timestamp first, alerts without a timestamp last, ties by id.
/// Every record is listed; fields that do not decode use their defaults.
pub fn render_alerts(
    snapshot: Option<&Value>,
    offset: &FixedOffset,
    placeholder: &str,
) -> AlertListing {
    let Some(Value::Object(entries)) = snapshot else {
        if let Some(other) = snapshot {
            log::warn!("Alerts snapshot is not an object: {other}");
        }
        return AlertListing::Placeholder(placeholder.to_string());
    };

    if entries.is_empty() {
        return AlertListing::Placeholder(placeholder.to_string());
    }

    let mut alerts: Vec<(&String, Alert)> = entries
        .iter()
        .map(|(id, value)| (id, Alert::from_value(value)))
        .collect();

    alerts.sort_by_key(|(id, alert)| {
        let ts = alert.timestamp_millis();
        (ts.is_none(), Reverse(ts), id.as_str().to_owned())
    });

    AlertListing::Items(
        alerts
            .into_iter()
            .map(|(id, alert)| RenderedAlert::new(id.as_str(), &alert, offset))
            .collect(),
    )
}

//! Stage status percentage and tier

use clinker_config::Stage;
use serde::Serialize;

/// Linear remap of a raw reading onto 0..=100.
///
/// `clamp(0, 100, round(value / 100 * 40 + 20))` with half-up rounding. The
/// mapping is fixed and unrelated to any parameter's calibration range.
pub fn derive_percentage(value: f64) -> u8 {
    let raw = (value / 100.0 * 40.0 + 20.0 + 0.5).floor();
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0) as u8
}

/// Status style tier. Exactly one applies at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTier {
    Critical,
    Warning,
    Success,
}

impl StatusTier {
    pub const ALL: [StatusTier; 3] = [StatusTier::Critical, StatusTier::Warning, StatusTier::Success];

    pub fn from_percentage(percentage: u8) -> Self {
        if percentage < 30 {
            StatusTier::Critical
        } else if percentage < 50 {
            StatusTier::Warning
        } else {
            StatusTier::Success
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            StatusTier::Critical => "critical",
            StatusTier::Warning => "warning",
            StatusTier::Success => "success",
        }
    }
}

/// Rendered status for one stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReading {
    pub label: String,
    pub percentage: u8,
    pub tier: StatusTier,
}

impl StatusReading {
    pub fn new(stage: &Stage, value: f64) -> Self {
        let percentage = derive_percentage(value);
        Self {
            label: stage.status_label.to_string(),
            percentage,
            tier: StatusTier::from_percentage(percentage),
        }
    }

    pub fn text(&self) -> String {
        format!("{}: {}%", self.label, self.percentage)
    }
}

//! Shared types for the Clinker process monitor
//!
//! This crate contains the records that flow between the config-system,
//! data-manager, system-integration and wasm-bridge crates: stage ids,
//! measurement nodes, alerts, chart points and the common error type.

use serde::{Deserialize, Serialize};

pub mod data_types;
pub mod errors;
pub mod number;

pub use data_types::{
    Alert, AlertSeverity, ChartPoint, MeasurementNode, NumericField, DEFAULT_ALERT_MESSAGE,
    DEFAULT_ALERT_TITLE, TIME_FIELD,
};
pub use errors::{ClinkerError, ClinkerResult, ErrorContext, ErrorResponse};
pub use number::{numeric_value, parse_float};

/// One of the six fixed process stages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum StageId {
    Step1,
    Step2,
    Step3,
    Step4,
    Step5,
    Step6,
}

impl StageId {
    /// All stages in pipeline order
    pub const ALL: [StageId; 6] = [
        StageId::Step1,
        StageId::Step2,
        StageId::Step3,
        StageId::Step4,
        StageId::Step5,
        StageId::Step6,
    ];

    /// Step number, 1-based
    pub fn number(self) -> u8 {
        match self {
            StageId::Step1 => 1,
            StageId::Step2 => 2,
            StageId::Step3 => 3,
            StageId::Step4 => 4,
            StageId::Step5 => 5,
            StageId::Step6 => 6,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(StageId::Step1),
            2 => Some(StageId::Step2),
            3 => Some(StageId::Step3),
            4 => Some(StageId::Step4),
            5 => Some(StageId::Step5),
            6 => Some(StageId::Step6),
            _ => None,
        }
    }

    /// Short display id used for element ids ("step3")
    pub fn as_str(self) -> &'static str {
        match self {
            StageId::Step1 => "step1",
            StageId::Step2 => "step2",
            StageId::Step3 => "step3",
            StageId::Step4 => "step4",
            StageId::Step5 => "step5",
            StageId::Step6 => "step6",
        }
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_numbers() {
        for (idx, stage) in StageId::ALL.iter().enumerate() {
            assert_eq!(stage.number() as usize, idx + 1);
            assert_eq!(StageId::from_number(stage.number()), Some(*stage));
        }
        assert_eq!(StageId::from_number(0), None);
        assert_eq!(StageId::from_number(7), None);
    }

    #[test]
    fn test_stage_serialization() {
        let json = serde_json::to_string(&StageId::Step4).unwrap();
        assert_eq!(json, "\"step4\"");
        assert_eq!(StageId::Step4.to_string(), "step4");
    }
}

//! Configuration system for the Clinker process monitor
//! Holds the static stage and parameter tables and the runtime settings
//! for the feed, dashboard and simulator views.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod parameters;
pub mod parser;
pub mod stages;
pub mod validation;

pub use parameters::{ParamRange, ParameterDefinition, ParameterTable, PARAMETERS};
pub use parser::{ConfigFormat, ConfigParser};
pub use stages::{Stage, StageTable, STAGES};
pub use validation::ConfigValidator;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl From<ConfigError> for clinker_shared::ClinkerError {
    fn from(err: ConfigError) -> Self {
        clinker_shared::ClinkerError::InvalidConfig {
            message: err.to_string(),
            field: None,
        }
    }
}

/// Complete runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub feed: FeedConfig,
    pub dashboard: DashboardConfig,
    pub simulator: SimulatorConfig,
    pub logging: LoggingConfig,
}

/// Realtime feed endpoint and watched paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Database root, e.g. `https://plant-1234.firebaseio.com`
    pub base_url: String,
    /// Database namespace, sent as the `ns` query parameter when set
    pub namespace: Option<String>,
    pub live_path: String,
    pub alerts_path: String,
    /// Path mirrored verbatim by the simulator
    pub raw_path: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9000".to_string(),
            namespace: None,
            live_path: "live_data".to_string(),
            alerts_path: "alerts/active".to_string(),
            raw_path: "live_data/step1_raw_material/current".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub no_alerts_text: String,
    /// Metrics listed per stage
    pub metric_count: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            no_alerts_text: "No active alerts".to_string(),
            metric_count: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub default_image: String,
    /// Image shown for the worst invalid step; `{step}` is replaced by its number
    pub step_image_template: String,
    pub out_of_bounds_message: String,
    pub efficiency_message: String,
    pub no_data_text: String,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            default_image: "images/default.png".to_string(),
            step_image_template: "images/step{step}.png".to_string(),
            out_of_bounds_message: "You are out of bound, please look into the process."
                .to_string(),
            efficiency_message: "Your current efficiency of the plant is 77%.".to_string(),
            no_data_text: "No data".to_string(),
        }
    }
}

impl SimulatorConfig {
    pub fn step_image(&self, step: u8) -> String {
        self.step_image_template
            .replace("{step}", &step.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `error`, `warn`, `info`, `debug`, `trace`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<log::LevelFilter> {
        self.level
            .parse::<log::LevelFilter>()
            .map_err(|_| ConfigError::Validation(format!("Invalid log level: {}", self.level)))
    }
}

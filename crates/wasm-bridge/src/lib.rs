//! WASM Bridge crate for the Clinker process monitor
//! Browser entry points for the dashboard and simulator pages

use clinker_config::{ConfigFormat, ConfigParser, ConfigValidator, MonitorConfig};
use clinker_shared::{ClinkerError, ClinkerResult};
use wasm_bindgen::prelude::*;

pub mod dom;
pub mod sparkline;
pub mod views;

#[cfg(target_arch = "wasm32")]
pub mod dashboard_app;
#[cfg(target_arch = "wasm32")]
pub mod simulator_app;

#[cfg(target_arch = "wasm32")]
pub use dashboard_app::DashboardApp;
#[cfg(target_arch = "wasm32")]
pub use simulator_app::SimulatorApp;

/// Clock refresh period
pub const CLOCK_PERIOD_MS: i32 = 1000;

/// Parse and validate a JSON config (empty means defaults), then set up logging
pub fn load_config(config_json: &str) -> ClinkerResult<MonitorConfig> {
    let config = ConfigParser::parse_str(config_json, ConfigFormat::Json)?;
    ConfigValidator::validate(&config)?;
    init_logging(&config);
    Ok(config)
}

fn init_logging(config: &MonitorConfig) {
    match config.logging.level_filter() {
        Ok(filter) => {
            if let Some(level) = filter.to_level() {
                // Already initialised by an earlier page instance
                let _ = console_log::init_with_level(level);
            }
        }
        Err(e) => log::warn!("Ignoring log level: {e}"),
    }
}

/// Validate a JSON config without starting anything
#[wasm_bindgen(js_name = validateConfig)]
pub fn validate_config(config_json: &str) -> Result<(), JsValue> {
    let config = ConfigParser::parse_str(config_json, ConfigFormat::Json).map_err(ClinkerError::from)?;
    ConfigValidator::validate(&config).map_err(ClinkerError::from)?;
    Ok(())
}

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

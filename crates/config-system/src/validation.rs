//! Configuration validation utilities

use crate::{
    ConfigError, MonitorConfig, ParameterDefinition, Result, StageTable, PARAMETERS,
};
use std::collections::HashSet;

/// Configuration validator with comprehensive checks
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration against the built-in parameter table
    pub fn validate(config: &MonitorConfig) -> Result<()> {
        Self::validate_with_parameters(config, &PARAMETERS)
    }

    pub fn validate_with_parameters(
        config: &MonitorConfig,
        definitions: &[ParameterDefinition],
    ) -> Result<()> {
        Self::validate_feed(&config.feed)?;
        Self::validate_dashboard(&config.dashboard)?;
        Self::validate_simulator(&config.simulator)?;
        config.logging.level_filter()?;
        Self::validate_parameter_table(definitions)?;
        Ok(())
    }

    fn validate_feed(feed: &crate::FeedConfig) -> Result<()> {
        let url = url::Url::parse(&feed.base_url).map_err(|e| {
            ConfigError::Validation(format!("Invalid feed base_url '{}': {}", feed.base_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "Unsupported feed scheme: {}. Must be http or https",
                url.scheme()
            )));
        }

        for (name, path) in [
            ("live_path", &feed.live_path),
            ("alerts_path", &feed.alerts_path),
            ("raw_path", &feed.raw_path),
        ] {
            if path.trim_matches('/').is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Feed {} cannot be empty",
                    name
                )));
            }
        }

        if let Some(ns) = &feed.namespace {
            if ns.trim().is_empty() {
                log::warn!("Empty feed namespace will be ignored");
            }
        }

        Ok(())
    }

    fn validate_dashboard(dashboard: &crate::DashboardConfig) -> Result<()> {
        if dashboard.metric_count == 0 {
            log::warn!("metric_count is 0, stage metric lists will stay empty");
        }
        Ok(())
    }

    fn validate_simulator(simulator: &crate::SimulatorConfig) -> Result<()> {
        if !simulator.step_image_template.contains("{step}") {
            return Err(ConfigError::Validation(format!(
                "step_image_template '{}' must contain a {{step}} placeholder",
                simulator.step_image_template
            )));
        }

        if simulator.default_image.is_empty() {
            return Err(ConfigError::Validation(
                "default_image cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate the built-in parameter table
    pub fn validate_parameters() -> Result<()> {
        Self::validate_parameter_table(&PARAMETERS)
    }

    /// Validate a parameter table: unique keys, ordered ranges, known steps
    pub fn validate_parameter_table(definitions: &[ParameterDefinition]) -> Result<()> {
        let mut seen = HashSet::new();

        for def in definitions {
            if !seen.insert(def.key) {
                return Err(ConfigError::Validation(format!(
                    "Duplicate parameter key: {}",
                    def.key
                )));
            }

            if !(def.range.min.is_finite() && def.range.max.is_finite()) {
                return Err(ConfigError::Validation(format!(
                    "Parameter {} has a non-finite range",
                    def.key
                )));
            }

            if def.range.min > def.range.max {
                return Err(ConfigError::Validation(format!(
                    "Parameter {} has min {} above max {}",
                    def.key, def.range.min, def.range.max
                )));
            }

            if def.range.min == def.range.max {
                log::debug!("Parameter {} accepts only {}", def.key, def.range.min);
            }

            if StageTable::by_number(def.step).is_none() {
                return Err(ConfigError::Validation(format!(
                    "Parameter {} belongs to unknown step {}",
                    def.key, def.step
                )));
            }
        }

        Ok(())
    }
}

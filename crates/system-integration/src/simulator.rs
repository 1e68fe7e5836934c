//! Parameter simulator controller

use crate::clock::{clock_text, Clock};
use crate::views::SimulatorView;
use clinker_config::{ParameterTable, SimulatorConfig};
use clinker_shared::{parse_float, ClinkerError, ClinkerResult};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Per-input violations reduced to the set of steps holding any of them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationTracker {
    violations: BTreeMap<String, u8>,
}

impl ViolationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace this input's contribution. Other inputs of the same step are untouched.
    pub fn record_violation(&mut self, step: u8, input: &str, violated: bool) {
        if violated {
            self.violations.insert(input.to_string(), step);
        } else {
            self.violations.remove(input);
        }
    }

    /// Lowest step currently holding a violation
    pub fn worst_step(&self) -> Option<u8> {
        self.violations.values().copied().min()
    }

    pub fn invalid_steps(&self) -> BTreeSet<u8> {
        self.violations.values().copied().collect()
    }

    pub fn is_violated(&self, input: &str) -> bool {
        self.violations.contains_key(input)
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn clear(&mut self) {
        self.violations.clear();
    }
}

/// Result of validating one input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCheck {
    InRange,
    OutOfRange,
    /// Not numeric; accepted without a violation
    NotANumber,
}

pub struct Simulator<V, C> {
    view: V,
    clock: C,
    config: SimulatorConfig,
    parameters: ParameterTable,
    tracker: ViolationTracker,
}

impl<V: SimulatorView, C: Clock> Simulator<V, C> {
    pub fn new(view: V, clock: C, config: SimulatorConfig) -> Self {
        Self::with_parameters(view, clock, config, ParameterTable::default())
    }

    pub fn with_parameters(
        view: V,
        clock: C,
        config: SimulatorConfig,
        parameters: ParameterTable,
    ) -> Self {
        Self {
            view,
            clock,
            config,
            parameters,
            tracker: ViolationTracker::new(),
        }
    }

    /// Render the input rows, show the clock and validate every empty input once
    pub fn mount(&mut self) {
        let parameters = self.parameters;
        self.view.render_rows(parameters.definitions());
        self.tick_clock();
        for def in parameters.iter() {
            if let Err(e) = self.validate_input(def.key, "") {
                log::warn!("Initial validation of {} failed: {e}", def.key);
            }
        }
        log::info!("Simulator mounted with {} parameters", self.parameters.len());
    }

    /// Validate one input and refresh the step image and banner
    pub fn validate_input(&mut self, key: &str, text: &str) -> ClinkerResult<InputCheck> {
        let Some(def) = self.parameters.get(key) else {
            log::warn!("Unknown simulator parameter '{key}'");
            return Err(ClinkerError::UnknownParameter {
                key: key.to_string(),
            });
        };

        let check = match parse_float(text) {
            None => InputCheck::NotANumber,
            Some(value) if def.range.contains(value) => InputCheck::InRange,
            Some(value) => {
                log::debug!(
                    "{key}={value} outside [{}, {}] (step {})",
                    def.range.min,
                    def.range.max,
                    def.step
                );
                InputCheck::OutOfRange
            }
        };

        let violated = check == InputCheck::OutOfRange;
        self.tracker.record_violation(def.step, key, violated);
        self.view.set_row_error(key, violated);
        self.refresh();
        Ok(check)
    }

    fn refresh(&mut self) {
        match self.tracker.worst_step() {
            None => {
                self.view.show_step_image(&self.config.default_image);
                self.view.show_banner(None);
            }
            Some(step) => {
                self.view.show_step_image(&self.config.step_image(step));
                self.view.show_banner(Some(self.config.out_of_bounds_message.as_str()));
            }
        }
    }

    /// Efficiency button
    pub fn submit(&mut self) {
        self.view.show_efficiency(&self.config.efficiency_message);
    }

    /// Mirror the raw feed value as pretty-printed JSON
    pub fn apply_raw(&mut self, snapshot: Option<&Value>) {
        let text = match snapshot {
            Some(value) => match serde_json::to_string_pretty(value) {
                Ok(text) => text,
                Err(e) => {
                    log::error!("Failed to format raw snapshot: {e}");
                    self.config.no_data_text.clone()
                }
            },
            None => self.config.no_data_text.clone(),
        };
        self.view.render_raw(&text);
    }

    pub fn tick_clock(&mut self) {
        let text = clock_text(&self.clock.now());
        self.view.render_clock(&text);
    }

    pub fn tracker(&self) -> &ViolationTracker {
        &self.tracker
    }

    pub fn parameters(&self) -> &ParameterTable {
        &self.parameters
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_aggregates_per_step() {
        let mut tracker = ViolationTracker::new();
        assert_eq!(tracker.worst_step(), None);

        tracker.record_violation(4, "KilnDrivePower", true);
        tracker.record_violation(1, "FeedSize", true);
        tracker.record_violation(1, "ProductSize", true);
        assert_eq!(tracker.worst_step(), Some(1));
        assert_eq!(tracker.invalid_steps(), BTreeSet::from([1, 4]));

        // A sibling input still holds step 1
        tracker.record_violation(1, "FeedSize", false);
        assert_eq!(tracker.worst_step(), Some(1));

        tracker.record_violation(1, "ProductSize", false);
        assert_eq!(tracker.worst_step(), Some(4));
        assert!(!tracker.is_violated("ProductSize"));

        tracker.record_violation(4, "KilnDrivePower", false);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_repeated_record_is_idempotent() {
        let mut tracker = ViolationTracker::new();
        tracker.record_violation(3, "FuelFlowRate", true);
        tracker.record_violation(3, "FuelFlowRate", true);
        tracker.record_violation(3, "FuelFlowRate", false);
        assert!(tracker.is_empty());

        tracker.record_violation(2, "C5Temperature", false);
        assert!(tracker.is_empty());
    }
}

//! Live dashboard controller

use crate::alerts::render_alerts;
use crate::clock::{chart_label, clock_text, Clock};
use crate::metrics::metric_entries;
use crate::status::StatusReading;
use crate::views::DashboardView;
use clinker_config::{DashboardConfig, Stage, StageTable};
use clinker_data::{first_numeric_field, RollingSeries};
use clinker_shared::{ChartPoint, MeasurementNode, StageId};
use serde_json::Value;
use std::collections::BTreeMap;

/// Key of the latest reading inside a stage node
const CURRENT_FIELD: &str = "current";

pub struct Dashboard<V, C> {
    view: V,
    clock: C,
    config: DashboardConfig,
    series: BTreeMap<StageId, RollingSeries>,
}

impl<V: DashboardView, C: Clock> Dashboard<V, C> {
    pub fn new(view: V, clock: C, config: DashboardConfig) -> Self {
        let series = StageId::ALL
            .iter()
            .map(|id| (*id, RollingSeries::new()))
            .collect();
        Self {
            view,
            clock,
            config,
            series,
        }
    }

    /// Apply a live-data snapshot keyed by stage feed key.
    ///
    /// Returns the number of stages whose chart received a point.
    pub fn apply_live_snapshot(&mut self, snapshot: Option<&Value>) -> usize {
        let Some(snapshot) = snapshot else {
            log::debug!("Live data is empty");
            return 0;
        };
        let Value::Object(stages) = snapshot else {
            log::warn!("Live data snapshot is not an object");
            return 0;
        };

        let mut charted = 0;
        for (feed_key, node) in stages {
            let Some(stage) = StageTable::by_feed_key(feed_key) else {
                log::debug!("Ignoring unknown stage key '{feed_key}'");
                continue;
            };
            let Some(current) = node.get(CURRENT_FIELD).and_then(MeasurementNode::from_value)
            else {
                log::warn!("No current reading for {feed_key}");
                continue;
            };

            log::debug!("Updating {feed_key} -> {}", stage.id);
            if self.apply_stage(stage, &current) {
                charted += 1;
            }
        }
        charted
    }

    /// Push one stage reading to its chart, metrics and status.
    /// Returns false when the reading had no numeric field.
    pub fn apply_stage(&mut self, stage: &Stage, current: &MeasurementNode) -> bool {
        let field = first_numeric_field(current);

        if let Some(field) = &field {
            let label = chart_label(&self.clock.now());
            log::trace!("Plotting {}: {{{}: {}}} at {label}", stage.id, field.key, field.value);
            let series = self.series.entry(stage.id).or_default();
            series.push(ChartPoint::new(label, field.value));
            self.view.render_series(stage.id, series);
        } else {
            log::warn!("No numeric field for {}, skipping chart", stage.id);
        }

        let metrics = metric_entries(current, self.config.metric_count);
        self.view.render_metrics(stage.id, &metrics);

        match field {
            Some(field) => {
                self.view
                    .render_status(stage.id, &StatusReading::new(stage, field.value));
                true
            }
            None => false,
        }
    }

    /// Replace the alert list from an alerts snapshot
    pub fn apply_alerts(&mut self, snapshot: Option<&Value>) {
        let offset = *self.clock.now().offset();
        let listing = render_alerts(snapshot, &offset, &self.config.no_alerts_text);
        self.view.render_alerts(&listing);
    }

    pub fn tick_clock(&mut self) {
        let text = clock_text(&self.clock.now());
        self.view.render_clock(&text);
    }

    pub fn series(&self, stage: StageId) -> Option<&RollingSeries> {
        self.series.get(&stage)
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}

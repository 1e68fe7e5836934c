//! Rendering capabilities consumed by the controllers
//!
//! Each region of the page is a view that accepts plain data. A view whose
//! target element is missing renders nothing.

use crate::alerts::AlertListing;
use crate::metrics::MetricEntry;
use crate::status::StatusReading;
use clinker_config::ParameterDefinition;
use clinker_data::RollingSeries;
use clinker_shared::StageId;

pub trait ChartView {
    /// Redraw a stage chart immediately, without transition
    fn render_series(&mut self, stage: StageId, series: &RollingSeries);
}

pub trait StatusView {
    /// Set the status text and swap to the reading's tier class
    fn render_status(&mut self, stage: StageId, reading: &StatusReading);
}

pub trait MetricsView {
    /// Replace the whole metric list of a stage
    fn render_metrics(&mut self, stage: StageId, metrics: &[MetricEntry]);
}

pub trait AlertListView {
    fn render_alerts(&mut self, listing: &AlertListing);
}

pub trait ClockView {
    fn render_clock(&mut self, text: &str);
}

/// Everything the dashboard page draws
pub trait DashboardView: ChartView + StatusView + MetricsView + AlertListView + ClockView {}

impl<T> DashboardView for T where T: ChartView + StatusView + MetricsView + AlertListView + ClockView {}

/// Everything the simulator page draws
pub trait SimulatorView: ClockView {
    /// Build one input row per parameter, in order
    fn render_rows(&mut self, parameters: &[ParameterDefinition]);

    fn set_row_error(&mut self, key: &str, errored: bool);

    fn show_step_image(&mut self, src: &str);

    /// `Some(text)` shows the banner, `None` clears and hides it
    fn show_banner(&mut self, text: Option<&str>);

    fn show_efficiency(&mut self, text: &str);

    fn render_raw(&mut self, text: &str);
}

//! System integration for the Clinker process monitor
//!
//! Controllers for the dashboard and simulator pages. They own the page
//! state, derive everything shown from feed snapshots and user input, and
//! hand plain data to view traits so the logic runs without a DOM.

pub mod alerts;
pub mod clock;
pub mod dashboard;
pub mod lifecycle;
pub mod metrics;
pub mod runtime;
pub mod simulator;
pub mod status;
pub mod views;

use clinker_shared::ClinkerError;
use thiserror::Error;

pub use alerts::{render_alerts, AlertListing, RenderedAlert};
pub use clock::{chart_label, clock_text, Clock, FixedClock, SystemClock};
pub use dashboard::Dashboard;
pub use lifecycle::{LifecycleCoordinator, LifecycleState, ResourceType};
pub use metrics::{format_label, format_value, metric_entries, MetricEntry};
pub use runtime::{run_dashboard, run_simulator_mirror, DashboardUpdate};
pub use simulator::{InputCheck, Simulator, ViolationTracker};
pub use status::{derive_percentage, StatusReading, StatusTier};
pub use views::{
    AlertListView, ChartView, ClockView, DashboardView, MetricsView, SimulatorView, StatusView,
};

/// System integration errors
#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    #[error(transparent)]
    Shared(#[from] ClinkerError),
}

pub type Result<T> = std::result::Result<T, IntegrationError>;

impl From<IntegrationError> for ClinkerError {
    fn from(err: IntegrationError) -> Self {
        match err {
            IntegrationError::Shared(inner) => inner,
            other => ClinkerError::Internal {
                message: other.to_string(),
            },
        }
    }
}

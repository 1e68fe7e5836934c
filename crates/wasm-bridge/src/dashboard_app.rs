//! Dashboard page entry point

use crate::dom::IntervalTimer;
use crate::views::DomDashboardView;
use crate::{load_config, CLOCK_PERIOD_MS};
use clinker_config::MonitorConfig;
use clinker_data::{EventSourceFeed, RealtimeFeed};
use clinker_integration::{
    run_dashboard, Dashboard, LifecycleCoordinator, ResourceType, SystemClock,
};
use clinker_shared::{ClinkerError, StageId};
use futures::future::{abortable, AbortHandle};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

type DomDashboard = Dashboard<DomDashboardView, SystemClock>;

#[wasm_bindgen]
pub struct DashboardApp {
    config: MonitorConfig,
    dashboard: Rc<RefCell<DomDashboard>>,
    lifecycle: LifecycleCoordinator,
    feed_task: Option<AbortHandle>,
    feed_paths: Vec<String>,
    clock_timer: Option<IntervalTimer>,
}

#[wasm_bindgen]
impl DashboardApp {
    /// Build the dashboard from a JSON config; empty means defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<DashboardApp, JsValue> {
        let config = load_config(config_json)?;
        let view = DomDashboardView::new()?;
        let dashboard = Dashboard::new(view, SystemClock, config.dashboard.clone());
        Ok(Self {
            config,
            dashboard: Rc::new(RefCell::new(dashboard)),
            lifecycle: LifecycleCoordinator::new(),
            feed_task: None,
            feed_paths: Vec::new(),
            clock_timer: None,
        })
    }

    /// Subscribe to the live and alert feeds and start the clock
    pub fn start(&mut self) -> Result<(), JsValue> {
        self.lifecycle.start().map_err(ClinkerError::from)?;

        let feed = EventSourceFeed::new(
            &self.config.feed.base_url,
            self.config.feed.namespace.clone(),
        )?;
        let live = feed.subscribe_str(&self.config.feed.live_path)?;
        let alerts = feed.subscribe_str(&self.config.feed.alerts_path)?;
        for path in [live.path().to_string(), alerts.path().to_string()] {
            self.lifecycle
                .register_resource(ResourceType::Subscription, path.clone());
            self.feed_paths.push(path);
        }

        let (task, handle) = abortable(run_dashboard(Rc::clone(&self.dashboard), live, alerts));
        wasm_bindgen_futures::spawn_local(async move {
            if task.await.is_err() {
                log::debug!("Dashboard feed task aborted");
            }
        });
        self.feed_task = Some(handle);

        self.dashboard.borrow_mut().tick_clock();
        let dashboard = Rc::clone(&self.dashboard);
        self.clock_timer = Some(IntervalTimer::start(CLOCK_PERIOD_MS, move || {
            dashboard.borrow_mut().tick_clock();
        })?);
        self.lifecycle.register_resource(ResourceType::Timer, "clock");

        log::info!("Dashboard started");
        Ok(())
    }

    /// Unsubscribe from the feeds and clear the clock
    pub fn stop(&mut self) -> Result<(), JsValue> {
        self.lifecycle.begin_shutdown().map_err(ClinkerError::from)?;

        if let Some(handle) = self.feed_task.take() {
            handle.abort();
        }
        for path in self.feed_paths.drain(..) {
            self.lifecycle
                .release_resource(ResourceType::Subscription, &path);
        }
        if self.clock_timer.take().is_some() {
            self.lifecycle.release_resource(ResourceType::Timer, "clock");
        }

        let leaked = self.lifecycle.finish().map_err(ClinkerError::from)?;
        log::info!("Dashboard stopped ({leaked} resources leaked)");
        Ok(())
    }

    /// Apply a live-data document directly, returning how many stages were charted
    #[wasm_bindgen(js_name = applyLiveData)]
    pub fn apply_live_data(&self, json: &str) -> Result<usize, JsValue> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(ClinkerError::from)?;
        Ok(self.dashboard.borrow_mut().apply_live_snapshot(Some(&value)))
    }

    /// Render an alerts document directly; `null` shows the placeholder
    #[wasm_bindgen(js_name = applyAlerts)]
    pub fn apply_alerts(&self, json: &str) -> Result<(), JsValue> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(ClinkerError::from)?;
        let snapshot = (!value.is_null()).then_some(&value);
        self.dashboard.borrow_mut().apply_alerts(snapshot);
        Ok(())
    }

    /// Stage ids in pipeline order
    pub fn stages(&self) -> js_sys::Array {
        StageId::ALL
            .iter()
            .map(|id| JsValue::from_str(id.as_str()))
            .collect()
    }
}

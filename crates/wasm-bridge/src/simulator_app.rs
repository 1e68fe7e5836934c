//! Simulator page entry point

use crate::dom::{self, by_id, EventListener, IntervalTimer};
use crate::views::DomSimulatorView;
use crate::{load_config, CLOCK_PERIOD_MS};
use clinker_config::MonitorConfig;
use clinker_data::{EventSourceFeed, RealtimeFeed};
use clinker_integration::{
    run_simulator_mirror, LifecycleCoordinator, ResourceType, Simulator, SystemClock,
};
use clinker_shared::{ClinkerError, ClinkerResult};
use futures::future::{abortable, AbortHandle};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, HtmlInputElement};

type DomSimulator = Simulator<DomSimulatorView, SystemClock>;

#[wasm_bindgen]
pub struct SimulatorApp {
    config: MonitorConfig,
    simulator: Rc<RefCell<DomSimulator>>,
    lifecycle: LifecycleCoordinator,
    listeners: Vec<EventListener>,
    mirror_task: Option<AbortHandle>,
    mirror_path: Option<String>,
    clock_timer: Option<IntervalTimer>,
}

#[wasm_bindgen]
impl SimulatorApp {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<SimulatorApp, JsValue> {
        let config = load_config(config_json)?;
        let view = DomSimulatorView::new()?;
        let simulator = Simulator::new(view, SystemClock, config.simulator.clone());
        Ok(Self {
            config,
            simulator: Rc::new(RefCell::new(simulator)),
            lifecycle: LifecycleCoordinator::new(),
            listeners: Vec::new(),
            mirror_task: None,
            mirror_path: None,
            clock_timer: None,
        })
    }

    /// Render the inputs, wire their listeners and start the clock and mirror
    pub fn start(&mut self) -> Result<(), JsValue> {
        self.lifecycle.start().map_err(ClinkerError::from)?;
        self.simulator.borrow_mut().mount();
        self.attach_listeners()?;

        let simulator = Rc::clone(&self.simulator);
        self.clock_timer = Some(IntervalTimer::start(CLOCK_PERIOD_MS, move || {
            simulator.borrow_mut().tick_clock();
        })?);
        self.lifecycle.register_resource(ResourceType::Timer, "clock");

        let feed = EventSourceFeed::new(
            &self.config.feed.base_url,
            self.config.feed.namespace.clone(),
        )?;
        let raw = feed.subscribe_str(&self.config.feed.raw_path)?;
        let path = raw.path().to_string();
        self.lifecycle
            .register_resource(ResourceType::Subscription, path.clone());
        self.mirror_path = Some(path);

        let (task, handle) = abortable(run_simulator_mirror(Rc::clone(&self.simulator), raw));
        wasm_bindgen_futures::spawn_local(async move {
            if task.await.is_err() {
                log::debug!("Simulator mirror task aborted");
            }
        });
        self.mirror_task = Some(handle);

        log::info!("Simulator started");
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), JsValue> {
        self.lifecycle.begin_shutdown().map_err(ClinkerError::from)?;

        if let Some(handle) = self.mirror_task.take() {
            handle.abort();
        }
        if let Some(path) = self.mirror_path.take() {
            self.lifecycle
                .release_resource(ResourceType::Subscription, &path);
        }
        if self.clock_timer.take().is_some() {
            self.lifecycle.release_resource(ResourceType::Timer, "clock");
        }
        self.listeners.clear();

        let leaked = self.lifecycle.finish().map_err(ClinkerError::from)?;
        log::info!("Simulator stopped ({leaked} resources leaked)");
        Ok(())
    }

    /// Validate one parameter as if its input changed
    pub fn validate(&self, key: &str, value: &str) -> Result<bool, JsValue> {
        let check = self.simulator.borrow_mut().validate_input(key, value)?;
        Ok(check != clinker_integration::InputCheck::OutOfRange)
    }

    /// Lowest step holding a violation, if any
    #[wasm_bindgen(js_name = worstStep)]
    pub fn worst_step(&self) -> Option<u8> {
        self.simulator.borrow().tracker().worst_step()
    }
}

impl SimulatorApp {
    fn attach_listeners(&mut self) -> ClinkerResult<()> {
        let document = dom::document()?;
        let parameters = *self.simulator.borrow().parameters();

        for def in parameters.iter() {
            let Some(input) = by_id::<HtmlInputElement>(&document, def.key) else {
                log::warn!("No input rendered for {}", def.key);
                continue;
            };
            let simulator = Rc::clone(&self.simulator);
            let key = def.key;
            let listener = EventListener::new(&input, "input", move |event| {
                let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                if let Err(e) = simulator.borrow_mut().validate_input(key, &input.value()) {
                    log::error!("Validation of {key} failed: {e}");
                }
            })?;
            self.listeners.push(listener);
        }

        if let Some(button) = by_id::<EventTarget>(&document, dom::CALCULATE_BUTTON_ID) {
            let simulator = Rc::clone(&self.simulator);
            self.listeners.push(EventListener::new(&button, "click", move |_| {
                simulator.borrow_mut().submit();
            })?);
        }
        Ok(())
    }
}

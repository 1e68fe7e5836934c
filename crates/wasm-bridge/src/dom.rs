//! DOM lookups, interval timers and event listeners

use clinker_shared::{ClinkerError, ClinkerResult};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, Window};

pub const CURRENT_TIME_ID: &str = "currentTime";
pub const ALERT_LIST_ID: &str = "alert-list";
pub const SIM_TIME_ID: &str = "simTime";
pub const SIM_CONTROLS_ID: &str = "simControls";
pub const STEP_IMAGE_ID: &str = "stepImage";
pub const OUT_OF_BOUNDS_ID: &str = "outOfBoundsMsg";
pub const CALCULATE_BUTTON_ID: &str = "calculateBtn";
pub const EFFICIENCY_ID: &str = "efficiencyMsg";
pub const SIMULATOR_FRAME_ID: &str = "simulatorFrame";

pub const HIDDEN_CLASS: &str = "hidden";
pub const ERROR_CLASS: &str = "error";
pub const PARAM_ROW_CLASS: &str = "param-row";

pub fn window() -> ClinkerResult<Window> {
    web_sys::window().ok_or_else(|| ClinkerError::MissingElement {
        selector: "window".to_string(),
    })
}

pub fn document() -> ClinkerResult<Document> {
    window()?
        .document()
        .ok_or_else(|| ClinkerError::MissingElement {
            selector: "document".to_string(),
        })
}

/// Element by id, `None` when the page does not have it
pub fn by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
}

pub fn query(document: &Document, selector: &str) -> Option<Element> {
    match document.query_selector(selector) {
        Ok(found) => found,
        Err(e) => {
            log::warn!("Invalid selector {selector}: {e:?}");
            None
        }
    }
}

/// Create an element with a class and optional text
pub fn element(document: &Document, tag: &str, class: &str, text: Option<&str>) -> ClinkerResult<Element> {
    let el = document.create_element(tag)?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    if text.is_some() {
        el.set_text_content(text);
    }
    Ok(el)
}

pub fn set_class(el: &Element, class: &str, enabled: bool) {
    let classes = el.class_list();
    let result = if enabled {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    };
    if let Err(e) = result {
        log::warn!("Failed to toggle class {class}: {e:?}");
    }
}

/// `setInterval` handle, cleared on drop
pub struct IntervalTimer {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl IntervalTimer {
    pub fn start(period_ms: i32, callback: impl FnMut() + 'static) -> ClinkerResult<Self> {
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut()>);
        let handle = window()?.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            period_ms,
        )?;
        Ok(Self {
            handle,
            _callback: callback,
        })
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        if let Ok(window) = window() {
            window.clear_interval_with_handle(self.handle);
        }
    }
}

/// Registered DOM event listener, removed on drop
pub struct EventListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    pub fn new(
        target: &EventTarget,
        event: &'static str,
        callback: impl FnMut(Event) + 'static,
    ) -> ClinkerResult<Self> {
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

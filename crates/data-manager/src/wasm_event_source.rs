//! Browser realtime feed over `EventSource`
//!
//! Speaks the same streaming protocol as the native client. The JS closures
//! live as long as the subscription; unsubscribing closes the source. A
//! transport error closes it too, so nothing is retried.

use crate::document::FeedPath;
use crate::event_stream::{endpoint_url, RawEvent, StreamSession, StreamStep};
use crate::feed::{FeedEvent, RealtimeFeed, Subscription};
use clinker_shared::{ClinkerError, ClinkerResult};
use futures::channel::mpsc;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventSource, MessageEvent};

const DATA_EVENTS: [&str; 5] = ["put", "patch", "keep-alive", "cancel", "auth_revoked"];

/// Realtime feed backed by the browser's `EventSource`
#[derive(Debug, Clone)]
pub struct EventSourceFeed {
    base_url: String,
    namespace: Option<String>,
}

impl EventSourceFeed {
    pub fn new(base_url: impl Into<String>, namespace: Option<String>) -> ClinkerResult<Self> {
        let base_url = base_url.into();
        endpoint_url(&base_url, namespace.as_deref(), &FeedPath::root())?;
        Ok(Self {
            base_url,
            namespace,
        })
    }
}

/// Keeps the source and its listeners alive
struct EventSourceGuard {
    source: EventSource,
    _on_events: Vec<Closure<dyn FnMut(MessageEvent)>>,
    _on_error: Closure<dyn FnMut(Event)>,
}

impl EventSourceGuard {
    fn close(self) {
        self.source.close();
    }
}

impl RealtimeFeed for EventSourceFeed {
    fn subscribe(&self, path: &FeedPath) -> ClinkerResult<Subscription> {
        let url = endpoint_url(&self.base_url, self.namespace.as_deref(), path)?;
        let source = EventSource::new(url.as_str())?;

        let (tx, rx) = mpsc::unbounded();
        let tx = Rc::new(RefCell::new(tx));
        let session = Rc::new(RefCell::new(StreamSession::new(path.clone())));

        let mut on_events = Vec::with_capacity(DATA_EVENTS.len());
        for name in DATA_EVENTS {
            let tx_clone = tx.clone();
            let session = session.clone();
            let source_clone = source.clone();
            let watched = path.clone();
            let on_event = Closure::wrap(Box::new(move |e: MessageEvent| {
                let raw = RawEvent::new(name, e.data().as_string().unwrap_or_default());
                let step = session.borrow_mut().handle(&raw);
                let event = match step {
                    Ok(StreamStep::Snapshot(value)) => FeedEvent::Snapshot(value),
                    Ok(StreamStep::Idle) => return,
                    Ok(StreamStep::Closed(err)) => {
                        log::error!("Feed stream for {watched} closed: {err}");
                        source_clone.close();
                        FeedEvent::Error(err)
                    }
                    Err(err) => {
                        log::warn!("Skipping malformed stream event on {watched}: {err}");
                        FeedEvent::Error(err)
                    }
                };
                let _ = tx_clone.borrow_mut().unbounded_send(event);
            }) as Box<dyn FnMut(MessageEvent)>);

            source.add_event_listener_with_callback(name, on_event.as_ref().unchecked_ref())?;
            on_events.push(on_event);
        }

        let tx_clone = tx.clone();
        let source_clone = source.clone();
        let watched = path.clone();
        // The browser reconnects unless the source is closed here
        let on_error = Closure::wrap(Box::new(move |_e: Event| {
            log::error!("Feed stream error on {watched}");
            source_clone.close();
            let _ = tx_clone
                .borrow_mut()
                .unbounded_send(FeedEvent::Error(ClinkerError::FeedConnect {
                    message: format!("event source error on {watched}"),
                }));
        }) as Box<dyn FnMut(Event)>);
        source.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        log::info!("Opened event source {url}");
        let guard = EventSourceGuard {
            source,
            _on_events: on_events,
            _on_error: on_error,
        };
        Ok(Subscription::new(path.clone(), rx, move || guard.close()))
    }
}

//! Push-based realtime feed abstraction
//!
//! A subscription is a lazy, endless stream of whole-value snapshots for one
//! watched path. It cannot be restarted: once unsubscribed (or dropped) the
//! stream ends and a new subscription has to be taken out.

use crate::document::FeedPath;
use clinker_shared::{ClinkerError, ClinkerResult};
use futures::channel::mpsc;
use futures::stream::{Stream, StreamExt};
use serde_json::Value;
use std::pin::Pin;
use std::task::{Context, Poll};
use uuid::Uuid;

/// One notification from a subscription
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Complete value at the watched path; `None` when the path is empty
    Snapshot(Option<Value>),
    /// Non-fatal feed failure. Nothing is retried.
    Error(ClinkerError),
}

/// Source of realtime snapshots
pub trait RealtimeFeed {
    /// Watch `path`. The first event carries the current value.
    fn subscribe(&self, path: &FeedPath) -> ClinkerResult<Subscription>;

    fn subscribe_str(&self, path: &str) -> ClinkerResult<Subscription> {
        self.subscribe(&FeedPath::parse(path)?)
    }
}

/// Live subscription to one feed path
pub struct Subscription {
    id: Uuid,
    path: FeedPath,
    events: mpsc::UnboundedReceiver<FeedEvent>,
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap a receiver; `cancel` releases the transport when unsubscribing
    pub fn new(
        path: FeedPath,
        events: mpsc::UnboundedReceiver<FeedEvent>,
        cancel: impl FnOnce() + 'static,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), path, events, cancel)
    }

    pub fn with_id(
        id: Uuid,
        path: FeedPath,
        events: mpsc::UnboundedReceiver<FeedEvent>,
        cancel: impl FnOnce() + 'static,
    ) -> Self {
        Self {
            id,
            path,
            events,
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &FeedPath {
        &self.path
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Stop watching. Already-queued events are discarded.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
            self.events.close();
            log::debug!("Unsubscribed {} from {}", self.id, self.path);
        }
    }
}

impl Stream for Subscription {
    type Item = FeedEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<FeedEvent>> {
        let this = self.get_mut();
        if this.cancel.is_none() {
            return Poll::Ready(None);
        }
        this.events.poll_next_unpin(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("active", &self.is_active())
            .finish()
    }
}

//! In-process realtime feed
//!
//! Backs a [`FeedDocument`] and notifies every subscription whose path is an
//! ancestor or descendant of a written path. Used for embedding and tests.

use crate::document::{FeedDocument, FeedPath};
use crate::feed::{FeedEvent, RealtimeFeed, Subscription};
use clinker_shared::{ClinkerError, ClinkerResult};
use futures::channel::mpsc;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

struct Subscriber {
    path: FeedPath,
    tx: mpsc::UnboundedSender<FeedEvent>,
}

#[derive(Default)]
struct MemoryFeedInner {
    document: FeedDocument,
    subscribers: HashMap<Uuid, Subscriber>,
}

impl MemoryFeedInner {
    fn notify(&mut self, written: &FeedPath) {
        let document = &self.document;
        self.subscribers.retain(|id, sub| {
            if !sub.path.overlaps(written) {
                return true;
            }
            let delivered = sub
                .tx
                .unbounded_send(FeedEvent::Snapshot(document.snapshot(&sub.path)))
                .is_ok();
            if !delivered {
                log::debug!("Dropping closed subscriber {id}");
            }
            delivered
        });
    }
}

/// Shared handle to an in-memory feed
#[derive(Clone, Default)]
pub struct MemoryFeed {
    inner: Arc<Mutex<MemoryFeedInner>>,
}

impl MemoryFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(value: Value) -> Self {
        let feed = Self::new();
        feed.inner.lock().document = FeedDocument::from_value(value);
        feed
    }

    /// Replace the value at `path` (`null` deletes)
    pub fn set(&self, path: &str, value: Value) -> ClinkerResult<()> {
        let path = FeedPath::parse(path)?;
        let mut inner = self.inner.lock();
        inner.document.set(&path, value);
        inner.notify(&path);
        Ok(())
    }

    /// Merge children into the value at `path`
    pub fn update(&self, path: &str, children: Map<String, Value>) -> ClinkerResult<()> {
        let path = FeedPath::parse(path)?;
        let mut inner = self.inner.lock();
        inner.document.update(&path, children);
        inner.notify(&path);
        Ok(())
    }

    pub fn remove(&self, path: &str) -> ClinkerResult<()> {
        self.set(path, Value::Null)
    }

    /// Push an error to subscriptions overlapping `path`
    pub fn fail(&self, path: &str, error: ClinkerError) -> ClinkerResult<()> {
        let path = FeedPath::parse(path)?;
        let inner = self.inner.lock();
        for sub in inner.subscribers.values().filter(|s| s.path.overlaps(&path)) {
            let _ = sub.tx.unbounded_send(FeedEvent::Error(error.clone()));
        }
        Ok(())
    }

    pub fn snapshot(&self, path: &str) -> ClinkerResult<Option<Value>> {
        let path = FeedPath::parse(path)?;
        Ok(self.inner.lock().document.snapshot(&path))
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }
}

impl RealtimeFeed for MemoryFeed {
    fn subscribe(&self, path: &FeedPath) -> ClinkerResult<Subscription> {
        let (tx, rx) = mpsc::unbounded();
        let id = Uuid::new_v4();

        {
            let mut inner = self.inner.lock();
            let initial = inner.document.snapshot(path);
            tx.unbounded_send(FeedEvent::Snapshot(initial))
                .map_err(|e| ClinkerError::Internal {
                    message: format!("Subscription channel closed: {e}"),
                })?;
            inner.subscribers.insert(
                id,
                Subscriber {
                    path: path.clone(),
                    tx,
                },
            );
        }

        log::debug!("Subscribed {id} to {path}");
        let inner = Arc::clone(&self.inner);
        Ok(Subscription::with_id(id, path.clone(), rx, move || {
            inner.lock().subscribers.remove(&id);
        }))
    }
}

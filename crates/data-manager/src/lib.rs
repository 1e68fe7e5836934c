//! Data Manager crate for the Clinker process monitor
//! Handles realtime feed subscriptions, the feed document tree, numeric
//! field extraction and the per-stage rolling chart series.

pub mod document;
pub mod event_stream;
pub mod extraction;
pub mod feed;
pub mod memory_feed;
pub mod rolling_series;

#[cfg(not(target_arch = "wasm32"))]
pub mod rest_stream;

#[cfg(target_arch = "wasm32")]
pub mod wasm_event_source;

pub use document::{FeedDocument, FeedPath};
pub use event_stream::{endpoint_url, EventStreamParser, RawEvent, StreamMessage, StreamSession};
pub use extraction::first_numeric_field;
pub use feed::{FeedEvent, RealtimeFeed, Subscription};
pub use memory_feed::MemoryFeed;
pub use rolling_series::{RollingSeries, CHART_CAPACITY};

#[cfg(not(target_arch = "wasm32"))]
pub use rest_stream::RestStreamFeed;

#[cfg(target_arch = "wasm32")]
pub use wasm_event_source::EventSourceFeed;

//! Realtime-database streaming protocol over `text/event-stream`
//!
//! The REST streaming endpoint (`GET <path>.json` with
//! `Accept: text/event-stream`) emits `put` and `patch` events whose data is
//! `{"path": ..., "data": ...}` relative to the watched path, plus
//! `keep-alive`, `cancel` and `auth_revoked` control events.

use crate::document::{FeedDocument, FeedPath};
use bytes::BytesMut;
use clinker_shared::{ClinkerError, ClinkerResult};
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

/// One dispatched server-sent event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub event: String,
    pub data: String,
}

impl RawEvent {
    pub fn new(event: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            data: data.into(),
        }
    }
}

/// Incremental `text/event-stream` decoder. Chunks may split lines anywhere.
#[derive(Debug, Default)]
pub struct EventStreamParser {
    buffer: BytesMut,
    event: Option<String>,
    data: String,
    has_data: bool,
}

impl EventStreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning every event completed by them
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<RawEvent> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line = self.buffer.split_to(pos + 1);
            let mut line = &line[..pos];
            if line.last() == Some(&b'\r') {
                line = &line[..line.len() - 1];
            }
            let line = String::from_utf8_lossy(line);
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }

        events
    }

    fn process_line(&mut self, line: &str) -> Option<RawEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => {
                if self.has_data {
                    self.data.push('\n');
                }
                self.data.push_str(value);
                self.has_data = true;
            }
            // id and retry only matter for reconnection, which is not done
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<RawEvent> {
        let event = self.event.take();
        if !self.has_data {
            return None;
        }
        self.has_data = false;
        Some(RawEvent {
            event: event.unwrap_or_else(|| "message".to_string()),
            data: std::mem::take(&mut self.data),
        })
    }
}

#[derive(Deserialize)]
struct PathData {
    path: String,
    #[serde(default)]
    data: Value,
}

/// Decoded streaming message
#[derive(Debug, Clone, PartialEq)]
pub enum StreamMessage {
    Put { path: FeedPath, data: Value },
    Patch { path: FeedPath, data: Map<String, Value> },
    KeepAlive,
    Cancel(Option<String>),
    AuthRevoked,
    Unknown(String),
}

impl StreamMessage {
    pub fn decode(raw: &RawEvent) -> ClinkerResult<Self> {
        match raw.event.as_str() {
            "put" => {
                let body = Self::path_data(raw)?;
                Ok(StreamMessage::Put {
                    path: FeedPath::parse(&body.path)?,
                    data: body.data,
                })
            }
            "patch" => {
                let body = Self::path_data(raw)?;
                let Value::Object(data) = body.data else {
                    return Err(ClinkerError::FeedProtocol {
                        message: format!("patch data at {} is not an object", body.path),
                    });
                };
                Ok(StreamMessage::Patch {
                    path: FeedPath::parse(&body.path)?,
                    data,
                })
            }
            "keep-alive" => Ok(StreamMessage::KeepAlive),
            "cancel" => {
                let reason = serde_json::from_str::<Value>(&raw.data)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string));
                Ok(StreamMessage::Cancel(reason))
            }
            "auth_revoked" => Ok(StreamMessage::AuthRevoked),
            other => Ok(StreamMessage::Unknown(other.to_string())),
        }
    }

    fn path_data(raw: &RawEvent) -> ClinkerResult<PathData> {
        serde_json::from_str(&raw.data).map_err(|e| ClinkerError::FeedProtocol {
            message: format!("invalid {} payload: {e}", raw.event),
        })
    }
}

/// What a stream consumer should do after one event
#[derive(Debug, Clone, PartialEq)]
pub enum StreamStep {
    /// Watched value changed; forward the new snapshot
    Snapshot(Option<Value>),
    /// Nothing to forward
    Idle,
    /// Server ended the stream
    Closed(ClinkerError),
}

/// Local mirror of one watched path, fed by stream events
#[derive(Debug, Default)]
pub struct StreamSession {
    document: FeedDocument,
    watched: FeedPath,
}

impl StreamSession {
    pub fn new(watched: FeedPath) -> Self {
        Self {
            document: FeedDocument::new(),
            watched,
        }
    }

    pub fn handle(&mut self, raw: &RawEvent) -> ClinkerResult<StreamStep> {
        let step = match StreamMessage::decode(raw)? {
            StreamMessage::Put { path, data } => {
                self.document.set(&path, data);
                StreamStep::Snapshot(self.snapshot())
            }
            StreamMessage::Patch { path, data } => {
                self.document.update(&path, data);
                StreamStep::Snapshot(self.snapshot())
            }
            StreamMessage::KeepAlive => StreamStep::Idle,
            StreamMessage::Cancel(reason) => StreamStep::Closed(ClinkerError::FeedClosed {
                path: match reason {
                    Some(reason) => format!("{} ({reason})", self.watched),
                    None => self.watched.to_string(),
                },
            }),
            StreamMessage::AuthRevoked => StreamStep::Closed(ClinkerError::FeedClosed {
                path: format!("{} (auth revoked)", self.watched),
            }),
            StreamMessage::Unknown(event) => {
                log::debug!("Ignoring stream event '{event}' on {}", self.watched);
                StreamStep::Idle
            }
        };
        Ok(step)
    }

    /// Current value of the watched path
    pub fn snapshot(&self) -> Option<Value> {
        self.document.snapshot(&FeedPath::root())
    }
}

/// REST streaming URL for `path`: `<base>/<path>.json[?ns=<namespace>]`
pub fn endpoint_url(
    base_url: &str,
    namespace: Option<&str>,
    path: &FeedPath,
) -> ClinkerResult<Url> {
    let mut url = Url::parse(base_url).map_err(|e| ClinkerError::InvalidConfig {
        message: format!("invalid feed base url {base_url}: {e}"),
        field: Some("feed.base_url".to_string()),
    })?;

    let mut segments: Vec<String> = path.segments().to_vec();
    match segments.last_mut() {
        Some(last) => last.push_str(".json"),
        None => segments.push(".json".to_string()),
    }

    url.path_segments_mut()
        .map_err(|_| ClinkerError::InvalidConfig {
            message: format!("feed base url {base_url} cannot carry a path"),
            field: Some("feed.base_url".to_string()),
        })?
        .pop_if_empty()
        .extend(segments);

    if let Some(ns) = namespace.filter(|ns| !ns.trim().is_empty()) {
        url.query_pairs_mut().append_pair("ns", ns);
    }

    Ok(url)
}

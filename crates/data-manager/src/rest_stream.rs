//! Native realtime feed over the REST streaming endpoint
//!
//! Each subscription runs one long-lived `GET <path>.json` request inside a
//! tokio task. Unsubscribing aborts the task. A failed or ended stream is
//! reported once as [`FeedEvent::Error`] and is not reopened.

use crate::document::FeedPath;
use crate::event_stream::{endpoint_url, EventStreamParser, StreamSession, StreamStep};
use crate::feed::{FeedEvent, RealtimeFeed, Subscription};
use clinker_shared::{ClinkerError, ClinkerResult};
use futures::channel::mpsc;
use futures::StreamExt;
use reqwest::header::ACCEPT;
use url::Url;

/// Realtime feed client for a database root URL
#[derive(Debug, Clone)]
pub struct RestStreamFeed {
    client: reqwest::Client,
    base_url: String,
    namespace: Option<String>,
}

impl RestStreamFeed {
    pub fn new(base_url: impl Into<String>, namespace: Option<String>) -> ClinkerResult<Self> {
        let base_url = base_url.into();
        // Fail early on an unusable base url
        endpoint_url(&base_url, namespace.as_deref(), &FeedPath::root())?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ClinkerError::FeedConnect {
                message: format!("failed to build http client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url,
            namespace,
        })
    }

    pub fn endpoint(&self, path: &FeedPath) -> ClinkerResult<Url> {
        endpoint_url(&self.base_url, self.namespace.as_deref(), path)
    }
}

impl RealtimeFeed for RestStreamFeed {
    /// Fails with `FeedConnect` outside a tokio runtime
    fn subscribe(&self, path: &FeedPath) -> ClinkerResult<Subscription> {
        let url = self.endpoint(path)?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            ClinkerError::FeedConnect {
                message: format!("no tokio runtime for feed stream: {e} (URL: {url})"),
            }
        })?;
        let (tx, rx) = mpsc::unbounded();

        log::info!("Opening feed stream {url}");
        let handle = runtime.spawn(stream_path(self.client.clone(), url, path.clone(), tx));

        Ok(Subscription::new(path.clone(), rx, move || handle.abort()))
    }
}

async fn stream_path(
    client: reqwest::Client,
    url: Url,
    path: FeedPath,
    tx: mpsc::UnboundedSender<FeedEvent>,
) {
    if let Err(err) = run_stream(&client, url, path, &tx).await {
        log::error!("Feed stream failed: {err}");
        let _ = tx.unbounded_send(FeedEvent::Error(err));
    }
}

async fn run_stream(
    client: &reqwest::Client,
    url: Url,
    path: FeedPath,
    tx: &mpsc::UnboundedSender<FeedEvent>,
) -> ClinkerResult<()> {
    let response = client
        .get(url.clone())
        .header(ACCEPT, "text/event-stream")
        .send()
        .await
        .map_err(|e| ClinkerError::FeedConnect {
            message: format!("{e} (URL: {url})"),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClinkerError::FeedConnect {
            message: format!("HTTP {status} (URL: {url})"),
        });
    }

    let mut parser = EventStreamParser::new();
    let mut session = StreamSession::new(path.clone());
    let mut body = response.bytes_stream();

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| ClinkerError::FeedConnect {
            message: format!("stream read failed: {e} (URL: {url})"),
        })?;

        for raw in parser.feed(&chunk) {
            match session.handle(&raw) {
                Ok(StreamStep::Snapshot(value)) => {
                    log::trace!("Snapshot for {path}");
                    if tx.unbounded_send(FeedEvent::Snapshot(value)).is_err() {
                        // Subscriber is gone
                        return Ok(());
                    }
                }
                Ok(StreamStep::Idle) => {}
                Ok(StreamStep::Closed(err)) => return Err(err),
                Err(err) => {
                    log::warn!("Skipping malformed stream event on {path}: {err}");
                    let _ = tx.unbounded_send(FeedEvent::Error(err));
                }
            }
        }
    }

    Err(ClinkerError::FeedClosed {
        path: path.to_string(),
    })
}

//! Integration tests for the data manager

use clinker_data::{
    first_numeric_field, FeedEvent, MemoryFeed, RealtimeFeed, RestStreamFeed, RollingSeries,
    CHART_CAPACITY,
};
use clinker_shared::{ChartPoint, ClinkerError, MeasurementNode};
use futures::StreamExt;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve one canned HTTP response and return the request line
async fn serve_once(response: String) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&request).to_string()
    });

    (base_url, handle)
}

fn event_stream_response(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nConnection: close\r\n\r\n{body}"
    )
}

#[tokio::test]
async fn test_rest_stream_delivers_snapshots() {
    let _ = env_logger::builder().is_test(true).try_init();

    let body = concat!(
        "event: put\n",
        "data: {\"path\":\"/\",\"data\":{\"step4_kiln\":{\"current\":{\"Time\":\"10:00\",\"KilnDrivePower\":\"150\"}}}}\n\n",
        "event: keep-alive\n",
        "data: null\n\n",
        "event: patch\n",
        "data: {\"path\":\"/step4_kiln/current\",\"data\":{\"KilnDrivePower\":90}}\n\n",
    );
    let (base_url, server) = serve_once(event_stream_response(body)).await;

    let feed = RestStreamFeed::new(base_url, Some("plant-demo".to_string())).unwrap();
    let mut sub = feed.subscribe_str("live_data").unwrap();

    let first = sub.next().await.unwrap();
    assert_eq!(
        first,
        FeedEvent::Snapshot(Some(json!({
            "step4_kiln": {"current": {"Time": "10:00", "KilnDrivePower": "150"}}
        })))
    );

    let second = sub.next().await.unwrap();
    assert_eq!(
        second,
        FeedEvent::Snapshot(Some(json!({
            "step4_kiln": {"current": {"Time": "10:00", "KilnDrivePower": 90}}
        })))
    );

    // The server closed the connection; reported once
    assert!(matches!(
        sub.next().await,
        Some(FeedEvent::Error(ClinkerError::FeedClosed { .. }))
    ));

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /live_data.json?ns=plant-demo "));
    assert!(request.to_ascii_lowercase().contains("accept: text/event-stream"));
}

#[tokio::test]
async fn test_rest_stream_http_error() {
    let response =
        "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string();
    let (base_url, _server) = serve_once(response).await;

    let feed = RestStreamFeed::new(base_url, None).unwrap();
    let mut sub = feed.subscribe_str("alerts/active").unwrap();

    match sub.next().await {
        Some(FeedEvent::Error(ClinkerError::FeedConnect { message })) => {
            assert!(message.contains("404"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_rest_stream_cancel_event_closes() {
    let body = "event: cancel\ndata: \"permission denied\"\n\n";
    let (base_url, _server) = serve_once(event_stream_response(body)).await;

    let feed = RestStreamFeed::new(base_url, None).unwrap();
    let mut sub = feed.subscribe_str("alerts/active").unwrap();

    match sub.next().await {
        Some(FeedEvent::Error(ClinkerError::FeedClosed { path })) => {
            assert!(path.contains("permission denied"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn test_rest_stream_rejects_bad_base_url() {
    assert!(RestStreamFeed::new("not a url", None).is_err());
}

#[test]
fn test_rest_stream_subscribe_outside_runtime() {
    let feed = RestStreamFeed::new("http://127.0.0.1:9000", None).unwrap();
    match feed.subscribe_str("live_data") {
        Err(ClinkerError::FeedConnect { message }) => {
            assert!(message.contains("tokio runtime"));
            assert!(message.contains("live_data.json"));
        }
        other => panic!("expected FeedConnect, got {other:?}"),
    }
}

#[test]
fn test_memory_feed_to_rolling_series() {
    let feed = MemoryFeed::new();
    let mut sub = feed.subscribe_str("live_data/step1_raw_material/current").unwrap();
    let mut series = RollingSeries::new();

    futures::executor::block_on(async {
        assert_eq!(sub.next().await, Some(FeedEvent::Snapshot(None)));

        for minute in 0..25 {
            feed.set(
                "live_data/step1_raw_material/current",
                json!({"Time": format!("10:{minute:02}"), "FeedSize": minute}),
            )
            .unwrap();

            let Some(FeedEvent::Snapshot(Some(value))) = sub.next().await else {
                panic!("expected a snapshot");
            };
            let node = MeasurementNode::from_value(&value).unwrap();
            let field = first_numeric_field(&node).unwrap();
            series.push(ChartPoint::new(node.time().unwrap_or_default(), field.value));
        }
    });

    assert_eq!(series.len(), CHART_CAPACITY);
    assert_eq!(series.oldest().unwrap().label, "10:05");
    assert_eq!(series.latest().unwrap().value, 24.0);
}

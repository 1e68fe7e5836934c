//! Browser tests for the DOM views

#![cfg(target_arch = "wasm32")]

use clinker_config::{DashboardConfig, SimulatorConfig};
use clinker_data::{EventSourceFeed, FeedEvent, RealtimeFeed};
use clinker_shared::ClinkerError;
use futures::{FutureExt, StreamExt};
use clinker_integration::{Dashboard, Simulator, SystemClock};
use clinker_wasm::dom::{by_id, document};
use clinker_wasm::load_config;
use clinker_wasm::views::{DomDashboardView, DomSimulatorView};
use serde_json::json;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Element, HtmlImageElement};

wasm_bindgen_test_configure!(run_in_browser);

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn mount_fixture(html: &str) {
    let document = document().unwrap();
    let body = document.body().unwrap();
    body.set_inner_html(html);
}

#[wasm_bindgen_test]
fn test_load_config_defaults() {
    let config = load_config("").unwrap();
    assert_eq!(config.feed.live_path, "live_data");
    assert!(load_config("{not json").is_err());
}

#[wasm_bindgen_test]
fn test_simulator_view_flags_out_of_range() {
    mount_fixture(
        r#"<div id="simControls"></div>
           <img id="stepImage">
           <div id="outOfBoundsMsg" class="hidden"></div>
           <div id="simTime"></div>"#,
    );

    let view = DomSimulatorView::new().unwrap();
    let mut simulator = Simulator::new(view, SystemClock, SimulatorConfig::default());
    simulator.mount();

    let document = document().unwrap();
    let rows = document.query_selector_all(".param-row").unwrap();
    assert_eq!(rows.length(), 15);

    let image: HtmlImageElement = by_id(&document, "stepImage").unwrap();
    assert!(image.src().ends_with("images/default.png"));

    simulator.validate_input("FeedSize", "150").unwrap();
    assert!(image.src().ends_with("images/step1.png"));

    let banner: Element = by_id(&document, "outOfBoundsMsg").unwrap();
    assert!(!banner.class_list().contains("hidden"));
    assert_eq!(
        banner.text_content().unwrap(),
        "You are out of bound, please look into the process."
    );

    let row = document
        .get_element_by_id("FeedSize")
        .unwrap()
        .closest(".param-row")
        .unwrap()
        .unwrap();
    assert!(row.class_list().contains("error"));

    let time: Element = by_id(&document, "simTime").unwrap();
    assert!(time.text_content().unwrap().starts_with("Time: "));
}

#[wasm_bindgen_test]
fn test_dashboard_view_renders_stage_and_alerts() {
    mount_fixture(
        r#"<section id="step4">
             <canvas id="step4-chart" width="200" height="60"></canvas>
             <div class="parameter-status warning"></div>
             <div id="step4-metrics"></div>
           </section>
           <div id="alert-list"></div>"#,
    );

    let view = DomDashboardView::new().unwrap();
    let mut dashboard = Dashboard::new(view, SystemClock, DashboardConfig::default());
    let charted = dashboard.apply_live_snapshot(Some(&json!({
        "step4_kiln": {"current": {"Time": "10:00", "KilnDrivePower": "150"}},
        "step1_raw_material": {"current": {"FeedSize": 10}}
    })));
    // step1 has no elements on this page but is still charted
    assert_eq!(charted, 2);

    let document = document().unwrap();
    let status = document
        .query_selector("#step4 .parameter-status")
        .unwrap()
        .unwrap();
    assert_eq!(status.text_content().unwrap(), "Kiln Filling Degree: 80%");
    assert!(status.class_list().contains("success"));
    assert!(!status.class_list().contains("warning"));

    let metrics = document.query_selector_all("#step4-metrics .metric").unwrap();
    assert_eq!(metrics.length(), 1);

    dashboard.apply_alerts(None);
    let list: Element = by_id(&document, "alert-list").unwrap();
    assert_eq!(list.text_content().unwrap(), "No active alerts");

    dashboard.apply_alerts(Some(&json!({"a": {"severity": "warning", "title": "Low feed"}})));
    let item = list.first_element_child().unwrap();
    assert_eq!(item.class_name(), "alert-item alert-warning");
    assert!(item.text_content().unwrap().contains("Low feed"));
}

#[wasm_bindgen_test]
async fn test_event_source_error_is_not_retried() {
    // Nothing listens on port 1
    let feed = EventSourceFeed::new("http://127.0.0.1:1", None).unwrap();
    let mut sub = feed.subscribe_str("live_data").unwrap();

    match sub.next().await {
        Some(FeedEvent::Error(ClinkerError::FeedConnect { .. })) => {}
        other => panic!("expected FeedConnect, got {other:?}"),
    }

    // Longer than the browser reconnect delay
    sleep(6000).await;
    assert!(sub.next().now_or_never().is_none());
}

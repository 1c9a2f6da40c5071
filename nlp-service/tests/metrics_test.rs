mod common;

use common::TestApp;
use nlp_service::services::{init_metrics, FailingModel};
use reqwest::Client;
use serde_json::json;
use std::sync::{Arc, Once};

static RECORDER: Once = Once::new();

fn install_recorder() {
    RECORDER.call_once(|| init_metrics().expect("Failed to install metrics recorder"));
}

async fn scrape(app: &TestApp) -> String {
    Client::new()
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .text()
        .await
        .expect("Failed to read metrics")
}

#[tokio::test]
async fn successful_parse_is_recorded() {
    install_recorder();
    let app = TestApp::spawn().await;

    let response = app.post_parse(json!({ "text": "hello" }).to_string()).await;
    assert!(response.status().is_success());

    let metrics = scrape(&app).await;

    assert!(metrics.contains("nlp_parse_requests_total"));
    assert!(metrics.contains(r#"outcome="success""#));
    assert!(metrics.contains(r#"intent="greet""#));
    assert!(metrics.contains("nlp_inference_duration_seconds"));
    assert!(metrics.contains(r#"model="trustledger@20250917-101500""#));
    assert!(metrics.contains("http_requests_total"));
}

#[tokio::test]
async fn failed_parse_is_recorded() {
    install_recorder();
    let app = TestApp::spawn_with_model(Arc::new(FailingModel::new("out of memory"))).await;

    let response = app.post_parse(json!({ "text": "hello" }).to_string()).await;
    assert_eq!(response.status().as_u16(), 500);

    let metrics = scrape(&app).await;

    assert!(metrics.contains(r#"outcome="error""#));
    assert!(metrics.contains("nlp_inference_duration_seconds"));
}

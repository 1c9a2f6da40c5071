mod common;

use common::{TestApp, INTERNAL_ERROR};
use nlp_service::services::{ClientError, FailingModel, NlpClient, NlpClientConfig};
use axum::{http::HeaderMap, routing::post, Json, Router};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[tokio::test]
async fn client_parses_through_service() {
    let app = TestApp::spawn().await;
    let client = NlpClient::new(NlpClientConfig::new(format!("{}/", app.address))).unwrap();

    let parsed = client.parse("paid 12.50 for lunch").await.unwrap();

    assert_eq!(parsed.intent.as_deref(), Some("log_expense"));
    assert_eq!(parsed.confidence, 1.0);
    let amount = parsed
        .entities
        .iter()
        .find(|e| e.entity == "AMOUNT")
        .expect("Missing AMOUNT entity");
    assert_eq!(amount.value, "12.50");
}

/// Serve `/parse` with a canned greeting and report the request id it saw.
async fn spawn_recording_server() -> (String, Arc<Mutex<Option<String>>>) {
    let seen = Arc::new(Mutex::new(None));
    let recorded = seen.clone();

    let router = Router::new().route(
        "/parse",
        post(move |headers: HeaderMap| {
            let recorded = recorded.clone();
            async move {
                *recorded.lock().unwrap() = headers
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string);
                Json(json!({ "intent": "greet", "confidence": 1.0, "entities": [] }))
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    (address, seen)
}

#[tokio::test]
async fn client_forwards_request_id() {
    let (address, seen) = spawn_recording_server().await;
    let client = NlpClient::new(NlpClientConfig::new(address)).unwrap();

    let parsed = client
        .parse_with_request_id("hello", Some("corr-1"))
        .await
        .unwrap();

    assert_eq!(parsed.intent.as_deref(), Some("greet"));
    assert_eq!(seen.lock().unwrap().as_deref(), Some("corr-1"));
}

#[tokio::test]
async fn client_omits_request_id_when_none_given() {
    let (address, seen) = spawn_recording_server().await;
    let client = NlpClient::new(NlpClientConfig::new(address)).unwrap();

    client.parse("hello").await.unwrap();

    assert_eq!(*seen.lock().unwrap(), None);
}

#[tokio::test]
async fn client_surfaces_server_error_message() {
    let app = TestApp::spawn_with_model(Arc::new(FailingModel::new("disk on fire"))).await;
    let client = NlpClient::new(NlpClientConfig::new(app.address.clone())).unwrap();

    let err = client.parse("hello").await.unwrap_err();

    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(message, INTERNAL_ERROR);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn client_reports_health() {
    let app = TestApp::spawn().await;
    let client = NlpClient::new(NlpClientConfig::new(app.address.clone())).unwrap();

    let health = client.health().await.unwrap();

    assert_eq!(health.status, "UP");
}

#![allow(dead_code)]

use nlp_service::config::{ModelConfig, NlpConfig};
use nlp_service::services::NluModel;
use nlp_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub const SAMPLE_MODEL: &str = include_str!("../../models/20250917-101500-trustledger.json");
pub const INVALID_REQUEST: &str = "Invalid request. JSON with 'text' field is required.";
pub const INTERNAL_ERROR: &str = "An internal error occurred.";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    // Keeps the model directory alive for the duration of the test
    _models: Option<TempDir>,
}

impl TestApp {
    /// Spawn the service with the bundled sample model loaded from disk.
    pub async fn spawn() -> Self {
        let models = TempDir::new().expect("Failed to create model directory");
        write_file(models.path(), "20250917-101500-trustledger.json", SAMPLE_MODEL);

        let app = Application::build(test_config(models.path()))
            .await
            .expect("Failed to build test application");

        Self::run(app, Some(models)).await
    }

    /// Spawn the service around an injected model.
    pub async fn spawn_with_model(model: Arc<dyn NluModel>) -> Self {
        let config = test_config(Path::new("unused"));
        let app = Application::build_with_model(config, model)
            .await
            .expect("Failed to build test application");

        Self::run(app, None).await
    }

    async fn run(app: Application, models: Option<TempDir>) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            _models: models,
        }
    }

    pub async fn post_parse(&self, body: String) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/parse", self.address))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

pub fn test_config(model_dir: &Path) -> NlpConfig {
    NlpConfig {
        common: CoreConfig {
            port: 0,
            ..CoreConfig::default()
        },
        model: ModelConfig {
            directory: model_dir.display().to_string(),
            ..ModelConfig::default()
        },
    }
}

pub fn write_file(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).expect("Failed to write test file");
}

/// Minimal valid artifact with a single keyword intent.
pub fn tiny_model(name: &str, intent: &str) -> String {
    serde_json::json!({
        "name": name,
        "intents": [{ "name": intent, "keywords": ["hello"] }]
    })
    .to_string()
}

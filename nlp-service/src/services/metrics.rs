//! Metrics collection and Prometheus export.
//!
//! Initializes the metrics exporter and provides the /metrics endpoint handler.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the metrics recorder.
///
/// Must be called once at startup before any metrics are recorded.
pub fn init_metrics() -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    METRICS_HANDLE
        .set(handle)
        .map_err(|_| anyhow::anyhow!("Metrics handle already initialized"))
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

/// Count a parse request by outcome (`success` / `error`) and predicted intent.
pub fn record_parse(outcome: &'static str, intent: Option<&str>) {
    let intent = intent.unwrap_or("none").to_string();
    counter!("nlp_parse_requests_total", "outcome" => outcome, "intent" => intent).increment(1);
}

/// Record time spent inside the model, including blocking-pool scheduling.
pub fn record_inference_duration(model: &str, duration_secs: f64) {
    histogram!("nlp_inference_duration_seconds", "model" => model.to_string())
        .record(duration_secs);
}

//! Inference seam between the HTTP layer and a loaded model.

use crate::models::ParseOutcome;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    #[error("Inference task panicked: {0}")]
    Panicked(String),

    #[error("Inference task was cancelled")]
    Cancelled,
}

/// A loaded, read-only NLU model.
///
/// Implementations are shared across concurrent requests for the whole
/// process lifetime and must not rely on interior mutation.
pub trait NluModel: Send + Sync {
    /// Human-readable identifier, usually `name@version`.
    fn name(&self) -> &str;

    fn parse(&self, text: &str) -> Result<ParseOutcome, ModelError>;
}

/// Run `model.parse` on the blocking pool.
///
/// The task is detached from the caller: dropping the returned future does
/// not stop an inference already in flight. A panic inside the model is
/// reported as [`ModelError::Panicked`].
pub async fn run_inference(
    model: Arc<dyn NluModel>,
    text: String,
) -> Result<ParseOutcome, ModelError> {
    let task = tokio::task::spawn_blocking(move || model.parse(&text));

    match task.await {
        Ok(result) => result,
        Err(e) if e.is_panic() => {
            let payload = e.into_panic();
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic payload".to_string());
            Err(ModelError::Panicked(message))
        }
        Err(_) => Err(ModelError::Cancelled),
    }
}

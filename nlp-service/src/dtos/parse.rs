use crate::models::{Entity, ParseOutcome};
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service_core::error::AppError;

pub const INVALID_REQUEST_MESSAGE: &str = "Invalid request. JSON with 'text' field is required.";

/// Body of `POST /parse`.
///
/// Extraction accepts any content type. The body must be a JSON object whose
/// `text` member is a string; anything else is rejected with 400 before the
/// model is consulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

impl ParseRequest {
    pub fn from_slice(body: &[u8]) -> Result<Self, AppError> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            tracing::debug!(error = %e, "Rejected parse request with malformed JSON");
            invalid_request()
        })?;

        match value.get("text") {
            Some(Value::String(text)) => Ok(Self { text: text.clone() }),
            _ => Err(invalid_request()),
        }
    }
}

fn invalid_request() -> AppError {
    AppError::BadRequest(anyhow::anyhow!(INVALID_REQUEST_MESSAGE))
}

#[async_trait]
impl<S> FromRequest<S> for ParseRequest
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "Failed to read parse request body");
            AppError::BadRequest(anyhow::anyhow!(e.body_text()))
        })?;

        Self::from_slice(&body)
    }
}

/// Wire shape of a successful parse. Always carries exactly these three fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResponse {
    pub intent: Option<String>,
    pub confidence: f64,
    pub entities: Vec<Entity>,
}

impl From<ParseOutcome> for ParseResponse {
    fn from(outcome: ParseOutcome) -> Self {
        let (intent, confidence) = match outcome.intent {
            Some(prediction) => (Some(prediction.name), prediction.confidence),
            None => (None, 0.0),
        };

        Self {
            intent,
            confidence,
            entities: outcome.entities,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

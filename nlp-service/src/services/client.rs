//! HTTP client for calling nlp-service from other services.

use crate::dtos::{ErrorResponse, HealthResponse, ParseRequest, ParseResponse};
use reqwest::StatusCode;
use service_core::middleware::REQUEST_ID_HEADER;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("nlp-service responded with {status}: {message}")]
    Status { status: StatusCode, message: String },
}

#[derive(Debug, Clone)]
pub struct NlpClientConfig {
    /// Base URL, e.g. `http://nlp-service:5005`.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl NlpClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NlpClient {
    http: reqwest::Client,
    base_url: String,
}

impl NlpClient {
    pub fn new(config: NlpClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Parse `text` into intent, confidence and entities.
    pub async fn parse(&self, text: &str) -> Result<ParseResponse, ClientError> {
        self.parse_with_request_id(text, None).await
    }

    /// Like [`parse`](Self::parse), forwarding a correlation id.
    pub async fn parse_with_request_id(
        &self,
        text: &str,
        request_id: Option<&str>,
    ) -> Result<ParseResponse, ClientError> {
        let mut request = self
            .http
            .post(format!("{}/parse", self.base_url))
            .json(&ParseRequest {
                text: text.to_string(),
            });
        if let Some(id) = request_id {
            request = request.header(REQUEST_ID_HEADER, id);
        }

        let response = request.send().await?;
        tracing::debug!(status = %response.status(), "nlp-service parse responded");

        Self::decode(response).await
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        Err(ClientError::Status { status, message })
    }
}

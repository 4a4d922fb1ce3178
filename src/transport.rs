//! HTTP transport to the provider
//!
//! One bearer-authenticated JSON POST per call. Client and server error
//! statuses are raised as `TransportError::Status` with the response body
//! attached, so provider error codes survive into error classification.

use crate::config::TransportConfig;
use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;

/// Response that was not raised as an error
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    /// `None` when the body was empty or JSON `null`
    pub body: Option<serde_json::Value>,
}

impl TransportResponse {
    pub fn new(status: u16, body: Option<serde_json::Value>) -> Self {
        Self { status, body }
    }

    /// 200-class status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Synchronous request/response client, from the invoker's point of view
///
/// Any deadline belongs here; the invoker awaits exactly one `post`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    pub fn from_config(config: &TransportConfig) -> Result<Self, TransportError> {
        Self::new(Duration::from_secs(config.request_timeout_seconds))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_client_error() || status.is_server_error() {
            tracing::debug!(
                status = status.as_u16(),
                body_length = text.len(),
                "Provider returned error status"
            );
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(TransportResponse::new(status.as_u16(), decode_body(&text)?))
    }
}

fn decode_body(text: &str) -> Result<Option<serde_json::Value>, TransportError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    match serde_json::from_str(text) {
        Ok(serde_json::Value::Null) => Ok(None),
        Ok(value @ serde_json::Value::Object(_)) => Ok(Some(value)),
        Ok(other) => Err(TransportError::Decode {
            reason: format!("expected a JSON object, got {}", json_kind(&other)),
        }),
        Err(e) => Err(TransportError::Decode {
            reason: e.to_string(),
        }),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

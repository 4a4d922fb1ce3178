//! Model invocation
//!
//! `ModelInvoker` turns one `ModelRequest` into one provider call:
//! effective model → credentials → payload → POST → classified outcome.
//! Nothing is retried and nothing is cached between calls.

pub mod classify;
pub mod invocation_id;
pub mod payload;

pub use classify::{CONTEXT_LENGTH_EXCEEDED, InvokeOutcome};
pub use invocation_id::InvocationId;
pub use payload::{ChatPayload, build_messages, build_payload};

use crate::config::{Config, load_default_model};
use crate::credentials::{CredentialResolver, ModelConfig, StaticCredentialResolver};
use crate::error::{InvokeError, TransportError};
use crate::metrics::{Metrics, Outcome};
use crate::models::{ModelId, ModelRequest};
use crate::transport::{HttpTransport, Transport};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Capability shared by every provider client
///
/// Returns the raw response text, [`CONTEXT_LENGTH_EXCEEDED`], or `None`
/// for any other failure. Never returns an error.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn invoke(&self, request: &ModelRequest) -> Option<String>;
}

/// Azure OpenAI chat-completion client
pub struct ModelInvoker {
    resolver: Arc<dyn CredentialResolver>,
    transport: Arc<dyn Transport>,
    /// Fixed at construction
    default_model: Option<ModelId>,
    metrics: Option<Arc<Metrics>>,
}

impl ModelInvoker {
    pub fn new(
        resolver: Arc<dyn CredentialResolver>,
        transport: Arc<dyn Transport>,
        default_model: Option<ModelId>,
    ) -> Self {
        Self {
            resolver,
            transport,
            default_model,
            metrics: None,
        }
    }

    /// Build an invoker from a loaded configuration
    ///
    /// Reads the default model property once; credentials come from the
    /// `[[credentials]]` entries and the HTTP timeout from `[transport]`.
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let transport = HttpTransport::from_config(&config.transport)?;
        Ok(Self::new(
            Arc::new(StaticCredentialResolver::new(config.credentials.clone())),
            Arc::new(transport),
            load_default_model(config),
        ))
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn default_model(&self) -> Option<ModelId> {
        self.default_model
    }

    /// Request model, falling back to the configured default
    pub fn effective_model(&self, request: &ModelRequest) -> Result<ModelId, InvokeError> {
        request
            .model()
            .or(self.default_model)
            .ok_or(InvokeError::NoModelSpecified)
    }

    /// Invoke and return the classified outcome
    ///
    /// Context window overflow is an `Ok` outcome; every other failure is
    /// returned as the error that caused it.
    pub async fn try_invoke(&self, request: &ModelRequest) -> Result<InvokeOutcome, InvokeError> {
        self.execute(request, InvocationId::new()).await
    }

    async fn execute(
        &self,
        request: &ModelRequest,
        invocation_id: InvocationId,
    ) -> Result<InvokeOutcome, InvokeError> {
        let result = match self.call(request, invocation_id).await {
            Err(e) if classify::is_context_length_exceeded(&e) => {
                tracing::warn!(
                    invocation_id = %invocation_id,
                    error = %e,
                    "Model rejected request: context length exceeded"
                );
                Ok(InvokeOutcome::ContextLengthExceeded)
            }
            other => other,
        };

        if let Some(metrics) = &self.metrics {
            let outcome = match &result {
                Ok(outcome) => outcome.metric(),
                Err(_) => Outcome::Failed,
            };
            metrics.record_outcome(outcome);
        }

        result
    }

    async fn call(
        &self,
        request: &ModelRequest,
        invocation_id: InvocationId,
    ) -> Result<InvokeOutcome, InvokeError> {
        let model = self.effective_model(request)?;
        let config = ModelConfig::resolve(self.resolver.as_ref(), model)?;
        let payload = serde_json::to_value(build_payload(request))?;

        tracing::debug!(
            invocation_id = %invocation_id,
            model = %model,
            endpoint = %config.endpoint(),
            message_count = payload["messages"].as_array().map_or(0, Vec::len),
            has_functions = request.has_functions(),
            "Invoking model"
        );

        let started = Instant::now();
        let response = self
            .transport
            .post(config.endpoint(), config.api_key(), &payload)
            .await;
        if let Some(metrics) = &self.metrics {
            metrics.record_provider_call(model.model_id(), started.elapsed().as_secs_f64() * 1000.0);
        }

        let outcome = classify::classify_response(response?)?;
        if let InvokeOutcome::Empty { status } = outcome {
            tracing::warn!(
                invocation_id = %invocation_id,
                model = %model,
                status = status,
                "Model returned no usable response body"
            );
        }
        Ok(outcome)
    }
}

#[async_trait]
impl ModelClient for ModelInvoker {
    async fn invoke(&self, request: &ModelRequest) -> Option<String> {
        let invocation_id = InvocationId::new();
        match self.execute(request, invocation_id).await {
            Ok(outcome) => outcome.into_text(),
            Err(e) => {
                tracing::error!(
                    invocation_id = %invocation_id,
                    configuration = e.is_configuration(),
                    error = %classify::error_description(&e),
                    "Error while invoking Azure OpenAI model"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod outcome_tests;

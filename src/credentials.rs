//! Credential resolution
//!
//! Maps (provider, model, module, usage) to an endpoint URL and API key.
//! Credentials are resolved on every invocation and never cached.

use crate::config::CredentialEntry;
use crate::error::InvokeError;
use crate::models::{ModelId, is_blank};
use serde::{Deserialize, Serialize};

/// Provider key for Azure OpenAI deployments
pub const AZURE: &str = "azure";

/// Module asking for credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleContext {
    ModelClient,
}

/// What the credentials will be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelUsage {
    #[default]
    Chat,
    Embedding,
}

/// Raw resolver output; either field may be missing or blank
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub url: Option<String>,
    pub key: Option<String>,
}

/// Lookup service for provider credentials
pub trait CredentialResolver: Send + Sync {
    fn credentials(
        &self,
        provider: &str,
        model_id: &str,
        module: ModuleContext,
        usage: ModelUsage,
    ) -> Credentials;
}

/// Endpoint and key for one call
///
/// Only constructed from complete credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct ModelConfig {
    endpoint: String,
    api_key: String,
}

impl ModelConfig {
    /// Resolve chat credentials for `model`
    ///
    /// # Errors
    /// `MissingModelConfig` when the endpoint or key is absent or blank.
    pub fn resolve(resolver: &dyn CredentialResolver, model: ModelId) -> Result<Self, InvokeError> {
        let credentials = resolver.credentials(
            AZURE,
            model.model_id(),
            ModuleContext::ModelClient,
            ModelUsage::Chat,
        );
        Self::from_credentials(credentials, model)
    }

    pub fn from_credentials(credentials: Credentials, model: ModelId) -> Result<Self, InvokeError> {
        match (credentials.url, credentials.key) {
            (Some(endpoint), Some(api_key))
                if !is_blank(Some(&endpoint)) && !is_blank(Some(&api_key)) =>
            {
                Ok(Self { endpoint, api_key })
            }
            _ => Err(InvokeError::MissingModelConfig {
                model: model.name().to_string(),
            }),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

// Keeps the key out of logs.
impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Resolver backed by the `[[credentials]]` entries of the config file
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialResolver {
    entries: Vec<CredentialEntry>,
}

impl StaticCredentialResolver {
    pub fn new(entries: Vec<CredentialEntry>) -> Self {
        Self { entries }
    }
}

impl CredentialResolver for StaticCredentialResolver {
    fn credentials(
        &self,
        provider: &str,
        model_id: &str,
        _module: ModuleContext,
        usage: ModelUsage,
    ) -> Credentials {
        let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.provider() == provider && e.model() == model_id && e.usage() == usage)
        else {
            tracing::debug!(
                provider = provider,
                model_id = model_id,
                usage = ?usage,
                "No credential entry configured"
            );
            return Credentials::default();
        };

        Credentials {
            url: Some(entry.url().to_string()),
            key: entry.resolve_key(),
        }
    }
}

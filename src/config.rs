//! Configuration management for model-invoker
//!
//! Parses TOML configuration files and provides typed access to settings,
//! the property table used for startup defaults, and credential entries.

use crate::credentials::ModelUsage;
use crate::error::{AppError, AppResult};
use crate::models::{ModelId, is_blank};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Property holding the default Azure chat model name (e.g. `GPT_4O`)
pub const AZURE_LLM_MODEL: &str = "azure.llm.model";

/// Upper bound for `transport.request_timeout_seconds`
pub const MAX_REQUEST_TIMEOUT_SECONDS: u64 = 600;

/// Key/value property lookup
pub trait PropertySource {
    fn property(&self, key: &str) -> Option<String>;
}

impl PropertySource for HashMap<String, String> {
    fn property(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Read the default model from `source`
///
/// Called once at startup. A blank or missing property means no default;
/// an unparseable name is logged and also means no default.
pub fn load_default_model(source: &dyn PropertySource) -> Option<ModelId> {
    let name = source.property(AZURE_LLM_MODEL)?;
    if is_blank(Some(&name)) {
        return None;
    }

    match name.trim().parse::<ModelId>() {
        Ok(model) => {
            tracing::info!(model = %model, "Default model configured");
            Some(model)
        }
        Err(e) => {
            tracing::error!(
                property = AZURE_LLM_MODEL,
                value = %name,
                error = %e,
                "Error initializing default AI model"
            );
            None
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub properties: HashMap<String, String>,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub credentials: Vec<CredentialEntry>,
}

impl PropertySource for Config {
    fn property(&self, key: &str) -> Option<String> {
        self.properties.property(key)
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    60
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// One `[[credentials]]` entry
///
/// Fields are private; entries are created by deserialization and checked
/// by `Config::validate()`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialEntry {
    provider: String,
    /// Deployment id, e.g. `gpt-4o`
    model: String,
    #[serde(default)]
    usage: ModelUsage,
    url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    /// Environment variable holding the key, read at resolution time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key_env: Option<String>,
}

impl CredentialEntry {
    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn usage(&self) -> ModelUsage {
        self.usage
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Inline key, or the value of `key_env` if that variable is set
    pub fn resolve_key(&self) -> Option<String> {
        if let Some(key) = &self.key {
            return Some(key.clone());
        }
        let var = self.key_env.as_deref()?;
        match std::env::var(var) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(
                    provider = %self.provider,
                    model = %self.model,
                    key_env = var,
                    error = %e,
                    "Credential key environment variable not available"
                );
                None
            }
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|source| AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            })?;

        let config: Self = toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
            path: path_display.clone(),
            source,
        })?;

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Validate configuration after parsing
    ///
    /// Called by `from_file()` and `from_str()`; call it explicitly when
    /// building a `Config` by other means.
    pub fn validate(&self) -> AppResult<()> {
        let timeout = self.transport.request_timeout_seconds;
        if timeout == 0 {
            return Err(AppError::Config(
                "transport.request_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if timeout > MAX_REQUEST_TIMEOUT_SECONDS {
            return Err(AppError::Config(format!(
                "transport.request_timeout_seconds cannot exceed {} seconds, got {}",
                MAX_REQUEST_TIMEOUT_SECONDS, timeout
            )));
        }

        for entry in &self.credentials {
            if is_blank(Some(&entry.provider)) || is_blank(Some(&entry.model)) {
                return Err(AppError::Config(format!(
                    "Credential entry with url '{}' must name both provider and model",
                    entry.url
                )));
            }

            if !entry.url.starts_with("http://") && !entry.url.starts_with("https://") {
                return Err(AppError::Config(format!(
                    "Credential entry '{}/{}' has invalid url '{}'. \
                    url must start with 'http://' or 'https://'.",
                    entry.provider, entry.model, entry.url
                )));
            }

            if entry.key.is_some() && entry.key_env.is_some() {
                return Err(AppError::Config(format!(
                    "Credential entry '{}/{}' sets both key and key_env; use one",
                    entry.provider, entry.model
                )));
            }
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}

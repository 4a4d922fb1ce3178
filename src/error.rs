//! Error types for model-invoker
//!
//! `InvokeError` covers a single model invocation, `TransportError` the HTTP
//! leg of it, and `AppError` the process-level failures of the binary
//! (configuration files, request files).

use thiserror::Error;

/// Failure of one model invocation
///
/// `ModelClient::invoke` logs these and returns `None`; only
/// `ModelInvoker::try_invoke` hands them to the caller.
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("No model specified and no default model configured")]
    NoModelSpecified,

    #[error("Model configuration missing for: {model}")]
    MissingModelConfig { model: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Failed to serialize model response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl InvokeError {
    /// Whether the error came from configuration rather than the provider
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::NoModelSpecified | Self::MissingModelConfig { .. } => true,
            Self::Transport(_) | Self::Serialization(_) => false,
        }
    }
}

/// Failure of the HTTP call to the provider
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request to provider failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider answered with a client or server error status
    ///
    /// The body is kept verbatim; provider error codes such as
    /// `context_length_exceeded` are only available through it.
    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode provider response: {reason}")]
    Decode { reason: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// Process-level errors for the binary
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file '{path}': {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in '{path}': {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Failed to read request file '{path}': {source}")]
    RequestFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse request file '{path}': {source}")]
    RequestParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;

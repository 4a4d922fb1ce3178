//! Command-line interface for model-invoker
//!
//! Provides argument parsing, subcommand handling, and request file loading
//! for the `model-invoker` binary.

use crate::error::{AppError, AppResult};
use crate::models::ModelRequest;
use clap::{Parser, Subcommand};
use std::io::Read;

/// Invoke an Azure OpenAI chat model with a structured request
#[derive(Parser)]
#[command(name = "model-invoker")]
#[command(version)]
#[command(about = "Invoke an Azure OpenAI chat model with a structured request")]
#[command(
    long_about = "model-invoker resolves per-model credentials, builds a chat-completion \
    payload from a JSON request, performs one call, and prints the raw response. \
    Context window overflow is reported as CONTEXT_LENGTH_EXCEEDED."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Invoke the model with a JSON request
    Invoke {
        /// Request file path, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        request: String,

        /// Print Prometheus metrics to stderr after the call
        #[arg(long)]
        print_metrics: bool,
    },
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List known model identifiers and their deployment ids
    Models,
}

/// Load a `ModelRequest` from a file, or from stdin when `path` is "-"
pub fn read_request(path: &str) -> AppResult<ModelRequest> {
    let content = if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|source| AppError::RequestFileRead {
                path: "<stdin>".to_string(),
                source,
            })?;
        buffer
    } else {
        std::fs::read_to_string(path).map_err(|source| AppError::RequestFileRead {
            path: path.to_string(),
            source,
        })?
    };

    parse_request(&content, path)
}

/// Parse request JSON; `origin` is only used in error messages
pub fn parse_request(content: &str, origin: &str) -> AppResult<ModelRequest> {
    serde_json::from_str(content).map_err(|source| AppError::RequestParseFailed {
        path: origin.to_string(),
        source,
    })
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# model-invoker Configuration
# ===========================
#
# Properties, HTTP transport, credentials, and observability settings.

# ─────────────────────────────────────────────────────────────────────────────
# PROPERTIES
# ─────────────────────────────────────────────────────────────────────────────

[properties]
# Default model for requests that don't name one. Read once at startup.
# Must be a known model name (run `model-invoker models`); an unknown name
# is logged and leaves no default configured.
"azure.llm.model" = "GPT_4O"

# ─────────────────────────────────────────────────────────────────────────────
# TRANSPORT
# ─────────────────────────────────────────────────────────────────────────────

[transport]
# Deadline for the provider call in seconds (1-600). There are no retries.
request_timeout_seconds = 60

# ─────────────────────────────────────────────────────────────────────────────
# CREDENTIALS
# ─────────────────────────────────────────────────────────────────────────────
#
# One entry per (provider, deployment id, usage). Fields:
#   - provider: "azure"
#   - model: deployment id, e.g. "gpt-4o"
#   - usage: "chat" (default) or "embedding"
#   - url: full chat-completions URL including api-version
#   - key: inline API key, or
#   - key_env: environment variable holding the API key

[[credentials]]
provider = "azure"
model = "gpt-4o"
usage = "chat"
url = "https://your-resource.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-02-01"
key_env = "AZURE_OPENAI_API_KEY"

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error" (RUST_LOG overrides)
log_level = "info"
"#
}

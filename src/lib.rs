//! model-invoker - single-model chat-completion adapter
//!
//! Resolves per-model credentials, shapes an Azure OpenAI chat-completion
//! payload from a `ModelRequest`, performs one call, and returns the raw
//! response text, a context-overflow sentinel, or nothing.

pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod invoker;
pub mod metrics;
pub mod models;
pub mod registry;
pub mod telemetry;
pub mod transport;

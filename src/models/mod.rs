//! Request-side domain types
//!
//! Model identifiers, the caller's `ModelRequest`, and the chat message
//! shapes that end up in the provider payload.

pub mod model_id;
pub mod request;

pub use model_id::{ModelId, ModelIdParseError};
pub use request::{ChatMessage, FunctionCall, FunctionDefinition, ModelRequest, Role};

/// Absent, empty, or whitespace-only
pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|s| s.trim().is_empty())
}

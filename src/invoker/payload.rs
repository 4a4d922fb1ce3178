//! Chat-completion payload construction
//!
//! Pure functions of the request: no credentials, no network.

use crate::models::{ChatMessage, FunctionDefinition, ModelRequest, is_blank};
use serde::Serialize;

/// Value sent as `function_call` whenever functions are offered
pub const FUNCTION_CALL_AUTO: &str = "auto";

/// Provider request body
///
/// Optional keys are omitted entirely when unset. `functions` and
/// `function_call` are always both present or both absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatPayload {
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<FunctionDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<&'static str>,
}

/// Build the payload for `request`
///
/// Numeric parameters are only included when strictly positive. Non-finite
/// floats are treated as unset since JSON cannot carry them.
pub fn build_payload(request: &ModelRequest) -> ChatPayload {
    let (functions, function_call) = if request.has_functions() {
        (Some(request.functions().to_vec()), Some(FUNCTION_CALL_AUTO))
    } else {
        (None, None)
    };

    ChatPayload {
        messages: build_messages(request),
        max_tokens: Some(request.max_tokens()).filter(|v| *v > 0),
        temperature: positive(request.temperature()),
        top_p: positive(request.top_p()),
        functions,
        function_call,
    }
}

/// Finite and strictly positive, else unset
fn positive(value: f64) -> Option<f64> {
    Some(value).filter(|v| v.is_finite() && *v > 0.0)
}

/// Ordered `messages`: system prompt, user input, then function responses
///
/// Blank prompt or input is skipped. May be empty.
pub fn build_messages(request: &ModelRequest) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2 + request.function_responses().len());

    if let Some(prompt) = request.prompt()
        && !is_blank(Some(prompt))
    {
        messages.push(ChatMessage::system(prompt));
    }

    if let Some(input) = request.input()
        && !is_blank(Some(input))
    {
        messages.push(ChatMessage::user(input));
    }

    messages.extend_from_slice(request.function_responses());
    messages
}

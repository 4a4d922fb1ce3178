//! Model request and chat message types
//!
//! A `ModelRequest` is built once by the caller and then only read.
//! Numeric generation parameters use `<= 0` as "unset" so the provider
//! falls back to its own defaults.

use super::ModelId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Function,
    Tool,
}

/// One entry of the payload's `messages` array
///
/// `content` is always serialized, as `null` when absent; assistant messages
/// carrying a `function_call` have no content. Caller-supplied messages may
/// carry any JSON as content and keys this type does not name; those are
/// kept in `extra` and sent back out unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Function call requested by the model in an earlier turn
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments, exactly as the model produced them
    pub arguments: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Result of a function the model asked to call
    pub fn function(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Function,
            name: Some(name.into()),
            content: Some(Value::String(content.into())),
            function_call: None,
            extra: Map::new(),
        }
    }

    /// Replays the model's own function call so the following
    /// function result has its context
    pub fn assistant_function_call(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            name: None,
            content: None,
            function_call: Some(FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            }),
            extra: Map::new(),
        }
    }

    /// Content as text, when it is a JSON string
    pub fn text(&self) -> Option<&str> {
        self.content.as_ref().and_then(Value::as_str)
    }

    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            name: None,
            content: Some(Value::String(content.into())),
            function_call: None,
            extra: Map::new(),
        }
    }
}

/// Function the model may call, described by a JSON schema
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "empty_parameters")]
    pub parameters: serde_json::Value,
}

fn empty_parameters() -> serde_json::Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

impl FunctionDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            parameters,
        }
    }
}

/// Structured input for one model invocation
///
/// Deserializes from camelCase JSON; every field is optional there.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelRequest {
    model: Option<ModelId>,
    prompt: Option<String>,
    input: Option<String>,
    function_responses: Vec<ChatMessage>,
    max_tokens: i64,
    temperature: f64,
    top_p: f64,
    functions: Vec<FunctionDefinition>,
}

impl ModelRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: ModelId) -> Self {
        self.model = Some(model);
        self
    }

    /// System prompt
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// User input
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Messages appended after the system and user messages, in order
    pub fn with_function_responses(mut self, responses: Vec<ChatMessage>) -> Self {
        self.function_responses = responses;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: i64) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_functions(mut self, functions: Vec<FunctionDefinition>) -> Self {
        self.functions = functions;
        self
    }

    pub fn model(&self) -> Option<ModelId> {
        self.model
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn function_responses(&self) -> &[ChatMessage] {
        &self.function_responses
    }

    pub fn max_tokens(&self) -> i64 {
        self.max_tokens
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn top_p(&self) -> f64 {
        self.top_p
    }

    pub fn functions(&self) -> &[FunctionDefinition] {
        &self.functions
    }

    pub fn has_functions(&self) -> bool {
        !self.functions.is_empty()
    }
}

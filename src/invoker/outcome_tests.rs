//! Invocation outcome tests
//!
//! Drive `ModelInvoker` with in-memory credentials and a scripted
//! transport, covering each branch of outcome classification.

use super::*;
use crate::credentials::{Credentials, ModelUsage, ModuleContext};
use crate::transport::TransportResponse;
use serde_json::json;
use std::sync::Mutex;

struct FixedCredentials {
    credentials: Credentials,
    lookups: Mutex<Vec<String>>,
}

impl FixedCredentials {
    fn new(url: Option<&str>, key: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            credentials: Credentials {
                url: url.map(str::to_string),
                key: key.map(str::to_string),
            },
            lookups: Mutex::new(Vec::new()),
        })
    }

    fn complete() -> Arc<Self> {
        Self::new(Some("https://azure.example.test/chat"), Some("test-key"))
    }
}

impl CredentialResolver for FixedCredentials {
    fn credentials(
        &self,
        provider: &str,
        model_id: &str,
        module: ModuleContext,
        usage: ModelUsage,
    ) -> Credentials {
        assert_eq!(provider, "azure");
        assert_eq!(module, ModuleContext::ModelClient);
        assert_eq!(usage, ModelUsage::Chat);
        self.lookups.lock().unwrap().push(model_id.to_string());
        self.credentials.clone()
    }
}

enum Scripted {
    Respond(TransportResponse),
    FailStatus(u16, String),
}

struct ScriptedTransport {
    script: Scripted,
    calls: Mutex<Vec<(String, String, serde_json::Value)>>,
}

impl ScriptedTransport {
    fn new(script: Scripted) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), api_key.to_string(), body.clone()));
        match &self.script {
            Scripted::Respond(response) => Ok(response.clone()),
            Scripted::FailStatus(status, body) => Err(TransportError::Status {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

fn completion_body() -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "Hello!"},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 9, "completion_tokens": 2, "total_tokens": 11}
    })
}

fn request() -> ModelRequest {
    ModelRequest::new()
        .with_model(ModelId::Gpt4o)
        .with_prompt("You are helpful.")
        .with_input("Hi")
}

#[tokio::test]
async fn test_success_returns_serialized_body() {
    let transport = ScriptedTransport::new(Scripted::Respond(TransportResponse::new(
        200,
        Some(completion_body()),
    )));
    let invoker = ModelInvoker::new(FixedCredentials::complete(), transport.clone(), None);

    let text = invoker.invoke(&request()).await.expect("should return body");
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, completion_body());

    let calls = transport.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (url, key, body) = &calls[0];
    assert_eq!(url, "https://azure.example.test/chat");
    assert_eq!(key, "test-key");
    assert_eq!(
        body,
        &json!({
            "messages": [
                {"role": "system", "content": "You are helpful."},
                {"role": "user", "content": "Hi"}
            ]
        })
    );
}

#[tokio::test]
async fn test_request_model_overrides_default() {
    let credentials = FixedCredentials::complete();
    let transport = ScriptedTransport::new(Scripted::Respond(TransportResponse::new(
        200,
        Some(completion_body()),
    )));
    let invoker = ModelInvoker::new(credentials.clone(), transport, Some(ModelId::Gpt35Turbo));

    invoker.invoke(&request()).await;
    invoker
        .invoke(&ModelRequest::new().with_input("no model set"))
        .await;

    assert_eq!(
        *credentials.lookups.lock().unwrap(),
        vec!["gpt-4o".to_string(), "gpt-35-turbo".to_string()]
    );
}

#[tokio::test]
async fn test_no_model_and_no_default_is_absent() {
    let credentials = FixedCredentials::complete();
    let transport = ScriptedTransport::new(Scripted::Respond(TransportResponse::new(
        200,
        Some(completion_body()),
    )));
    let invoker = ModelInvoker::new(credentials.clone(), transport.clone(), None);
    let request = ModelRequest::new().with_input("hello");

    // The logged `configuration` field comes from `is_configuration()`;
    // log output itself is not captured here.
    assert_eq!(invoker.invoke(&request).await, None);
    match invoker.try_invoke(&request).await {
        Err(e @ InvokeError::NoModelSpecified) => assert!(e.is_configuration()),
        other => panic!("expected NoModelSpecified, got {:?}", other),
    }
    assert!(credentials.lookups.lock().unwrap().is_empty());
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_blank_key_skips_network_call() {
    let transport = ScriptedTransport::new(Scripted::Respond(TransportResponse::new(
        200,
        Some(completion_body()),
    )));
    let invoker = ModelInvoker::new(
        FixedCredentials::new(Some("https://azure.example.test/chat"), Some("  ")),
        transport.clone(),
        None,
    );

    assert_eq!(invoker.invoke(&request()).await, None);
    assert!(matches!(
        invoker.try_invoke(&request()).await,
        Err(InvokeError::MissingModelConfig { ref model }) if model == "GPT_4O"
    ));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_missing_url_skips_network_call() {
    let transport = ScriptedTransport::new(Scripted::Respond(TransportResponse::new(200, None)));
    let invoker = ModelInvoker::new(
        FixedCredentials::new(None, Some("test-key")),
        transport.clone(),
        Some(ModelId::Gpt4),
    );

    assert_eq!(invoker.invoke(&ModelRequest::new().with_input("x")).await, None);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_context_length_error_returns_sentinel() {
    let body = json!({
        "error": {
            "message": "This model's maximum context length is 8192 tokens. However, your messages resulted in 9001 tokens.",
            "type": "invalid_request_error",
            "param": "messages",
            "code": "context_length_exceeded"
        }
    });
    let transport = ScriptedTransport::new(Scripted::FailStatus(400, body.to_string()));
    let invoker = ModelInvoker::new(FixedCredentials::complete(), transport, None);

    assert_eq!(
        invoker.invoke(&request()).await.as_deref(),
        Some("CONTEXT_LENGTH_EXCEEDED")
    );
    assert_eq!(
        invoker.try_invoke(&request()).await.unwrap(),
        InvokeOutcome::ContextLengthExceeded
    );
}

#[tokio::test]
async fn test_other_error_status_is_absent() {
    let transport = ScriptedTransport::new(Scripted::FailStatus(
        500,
        r#"{"error":{"code":"server_error"}}"#.to_string(),
    ));
    let invoker = ModelInvoker::new(FixedCredentials::complete(), transport.clone(), None);

    assert_eq!(invoker.invoke(&request()).await, None);
    assert!(matches!(
        invoker.try_invoke(&request()).await,
        Err(InvokeError::Transport(TransportError::Status { status: 500, .. }))
    ));
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_success_status_without_body_is_absent() {
    let transport = ScriptedTransport::new(Scripted::Respond(TransportResponse::new(200, None)));
    let invoker = ModelInvoker::new(FixedCredentials::complete(), transport, None);

    assert_eq!(invoker.invoke(&request()).await, None);
    assert_eq!(
        invoker.try_invoke(&request()).await.unwrap(),
        InvokeOutcome::Empty { status: 200 }
    );
}

#[tokio::test]
async fn test_redirect_status_with_body_is_absent() {
    let transport = ScriptedTransport::new(Scripted::Respond(TransportResponse::new(
        304,
        Some(completion_body()),
    )));
    let invoker = ModelInvoker::new(FixedCredentials::complete(), transport, None);

    assert_eq!(invoker.invoke(&request()).await, None);
}

#[tokio::test]
async fn test_metrics_record_each_outcome() {
    let metrics = Arc::new(Metrics::new().unwrap());

    let ok = ModelInvoker::new(
        FixedCredentials::complete(),
        ScriptedTransport::new(Scripted::Respond(TransportResponse::new(
            200,
            Some(completion_body()),
        ))),
        None,
    )
    .with_metrics(metrics.clone());
    ok.invoke(&request()).await;

    let overflow = ModelInvoker::new(
        FixedCredentials::complete(),
        ScriptedTransport::new(Scripted::FailStatus(
            400,
            "context_length_exceeded".to_string(),
        )),
        None,
    )
    .with_metrics(metrics.clone());
    overflow.invoke(&request()).await;

    let unconfigured = ModelInvoker::new(
        FixedCredentials::new(None, None),
        ScriptedTransport::new(Scripted::Respond(TransportResponse::new(200, None))),
        None,
    )
    .with_metrics(metrics.clone());
    unconfigured.invoke(&request()).await;

    assert_eq!(metrics.outcome_count(Outcome::Success), 1);
    assert_eq!(metrics.outcome_count(Outcome::ContextLengthExceeded), 1);
    assert_eq!(metrics.outcome_count(Outcome::Failed), 1);
    assert_eq!(metrics.outcome_count(Outcome::Empty), 0);
}

#[test]
fn test_effective_model_resolution() {
    let invoker = ModelInvoker::new(
        FixedCredentials::complete(),
        ScriptedTransport::new(Scripted::Respond(TransportResponse::new(200, None))),
        Some(ModelId::Gpt4oMini),
    );
    assert_eq!(invoker.default_model(), Some(ModelId::Gpt4oMini));
    assert_eq!(
        invoker.effective_model(&ModelRequest::new()).unwrap(),
        ModelId::Gpt4oMini
    );
    assert_eq!(
        invoker
            .effective_model(&ModelRequest::new().with_model(ModelId::Gpt4))
            .unwrap(),
        ModelId::Gpt4
    );
}

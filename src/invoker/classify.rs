//! Outcome classification
//!
//! A response is either a usable body or nothing. Errors are opaque except
//! for one provider code, `context_length_exceeded`, found by substring
//! match on the error's full description. Providers send it as free text
//! inside the error body, so there is no structured field to match instead.

use crate::error::InvokeError;
use crate::metrics::Outcome;
use crate::transport::TransportResponse;
use std::error::Error as _;

/// Returned in place of a response when the input overflowed the context window
pub const CONTEXT_LENGTH_EXCEEDED: &str = "CONTEXT_LENGTH_EXCEEDED";

const CONTEXT_LENGTH_MARKER: &str = "context_length_exceeded";

/// Classified result of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeOutcome {
    /// Serialized response body, verbatim
    Success(String),
    /// Non-2xx status, or 2xx without a body
    Empty { status: u16 },
    ContextLengthExceeded,
}

impl InvokeOutcome {
    /// Collapse to the caller-facing text result
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Success(body) => Some(body),
            Self::Empty { .. } => None,
            Self::ContextLengthExceeded => Some(CONTEXT_LENGTH_EXCEEDED.to_string()),
        }
    }

    pub fn metric(&self) -> Outcome {
        match self {
            Self::Success(_) => Outcome::Success,
            Self::Empty { .. } => Outcome::Empty,
            Self::ContextLengthExceeded => Outcome::ContextLengthExceeded,
        }
    }
}

/// Turn a transport response into an outcome
///
/// # Errors
/// `Serialization` if the body cannot be written back out as JSON text.
pub fn classify_response(response: TransportResponse) -> Result<InvokeOutcome, InvokeError> {
    let success = response.is_success();
    match response.body {
        Some(body) if success => {
            Ok(InvokeOutcome::Success(serde_json::to_string(&body)?))
        }
        _ => Ok(InvokeOutcome::Empty {
            status: response.status,
        }),
    }
}

/// Whether `error` reports a context window overflow
pub fn is_context_length_exceeded(error: &InvokeError) -> bool {
    error_description(error)
        .to_ascii_lowercase()
        .contains(CONTEXT_LENGTH_MARKER)
}

/// Error message followed by every source in its chain
pub fn error_description(error: &InvokeError) -> String {
    let mut description = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        description.push_str(": ");
        description.push_str(&cause.to_string());
        source = cause.source();
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use serde_json::json;

    #[test]
    fn test_ok_with_body_is_success() {
        let body = json!({"id": "chatcmpl-1", "choices": []});
        let outcome = classify_response(TransportResponse::new(200, Some(body.clone()))).unwrap();
        match outcome {
            InvokeOutcome::Success(text) => {
                let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
                assert_eq!(parsed, body);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_ok_without_body_is_empty() {
        assert_eq!(
            classify_response(TransportResponse::new(200, None)).unwrap(),
            InvokeOutcome::Empty { status: 200 }
        );
    }

    #[test]
    fn test_non_success_status_is_empty_even_with_body() {
        assert_eq!(
            classify_response(TransportResponse::new(302, Some(json!({"moved": true})))).unwrap(),
            InvokeOutcome::Empty { status: 302 }
        );
    }

    #[test]
    fn test_context_length_detected_in_status_body() {
        let error = InvokeError::Transport(TransportError::Status {
            status: 400,
            body: json!({
                "error": {
                    "code": "context_length_exceeded",
                    "message": "This model's maximum context length is 8192 tokens."
                }
            })
            .to_string(),
        });
        assert!(is_context_length_exceeded(&error));
    }

    #[test]
    fn test_context_length_detection_ignores_case() {
        let error = InvokeError::Transport(TransportError::Decode {
            reason: "Context_Length_Exceeded".to_string(),
        });
        assert!(is_context_length_exceeded(&error));
    }

    #[test]
    fn test_other_errors_are_not_context_length() {
        let errors = [
            InvokeError::NoModelSpecified,
            InvokeError::MissingModelConfig {
                model: "GPT_4O".to_string(),
            },
            InvokeError::Transport(TransportError::Status {
                status: 429,
                body: r#"{"error":{"code":"rate_limit_exceeded"}}"#.to_string(),
            }),
            InvokeError::Transport(TransportError::Status {
                status: 400,
                body: "context length is fine".to_string(),
            }),
        ];
        for error in errors {
            assert!(!is_context_length_exceeded(&error), "{:?}", error);
        }
    }

    #[test]
    fn test_outcome_into_text() {
        assert_eq!(
            InvokeOutcome::Success("{}".to_string()).into_text(),
            Some("{}".to_string())
        );
        assert_eq!(InvokeOutcome::Empty { status: 500 }.into_text(), None);
        assert_eq!(
            InvokeOutcome::ContextLengthExceeded.into_text(),
            Some("CONTEXT_LENGTH_EXCEEDED".to_string())
        );
    }

    #[test]
    fn test_outcome_metric_labels() {
        assert_eq!(InvokeOutcome::Success(String::new()).metric(), Outcome::Success);
        assert_eq!(InvokeOutcome::Empty { status: 204 }.metric(), Outcome::Empty);
        assert_eq!(
            InvokeOutcome::ContextLengthExceeded.metric(),
            Outcome::ContextLengthExceeded
        );
    }
}

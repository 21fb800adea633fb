use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::api::{ChatReply, ChatRequest, ErrorReply};
use crate::core::constants::NO_RESPONSE_REPLY;
use crate::core::message::ChatMessage;

/// Reasons a completion request produced no reply.
#[derive(Debug)]
pub enum CompletionError {
    /// The request never got a response (connection refused, reset, ...).
    Transport(reqwest::Error),

    /// The proxy answered with a non-success status.
    Status {
        status: u16,
        /// `error` field of the response body, when there was one.
        message: Option<String>,
    },

    /// The proxy answered 2xx but the body was not the expected JSON.
    Malformed(String),

    /// No response within the configured request timeout.
    Timeout(Duration),

    /// The owning session ended while the request was in flight.
    Cancelled,
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::Transport(err) => write!(f, "completion request failed: {err}"),
            CompletionError::Status {
                status,
                message: Some(message),
            } => write!(f, "completion endpoint returned {status}: {message}"),
            CompletionError::Status {
                status,
                message: None,
            } => write!(f, "completion endpoint returned {status}"),
            CompletionError::Malformed(detail) => {
                write!(f, "malformed completion response: {detail}")
            }
            CompletionError::Timeout(after) => {
                write!(f, "completion request timed out after {}s", after.as_secs())
            }
            CompletionError::Cancelled => write!(f, "completion request cancelled"),
        }
    }
}

impl StdError for CompletionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CompletionError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

/// Obtains one completion string for a whole conversation.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, history: &[ChatMessage]) -> Result<String, CompletionError>;
}

/// Talks to the `/api/chat` proxy endpoint.
#[derive(Clone)]
pub struct ProxyCompletionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ProxyCompletionClient {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionClient for ProxyCompletionClient {
    async fn complete(&self, history: &[ChatMessage]) -> Result<String, CompletionError> {
        let request = ChatRequest {
            messages: history.to_vec(),
        };

        debug!(
            endpoint = %self.endpoint,
            turns = request.messages.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(CompletionError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(CompletionError::Transport)?;

        if !status.is_success() {
            return Err(CompletionError::Status {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        parse_reply(&body)
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorReply>(body)
        .ok()
        .and_then(|reply| reply.error)
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
}

fn parse_reply(body: &str) -> Result<String, CompletionError> {
    let parsed: ChatReply =
        serde_json::from_str(body).map_err(|err| CompletionError::Malformed(err.to_string()))?;
    Ok(parsed
        .reply
        .filter(|reply| !reply.is_empty())
        .unwrap_or_else(|| NO_RESPONSE_REPLY.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{no_proxy_client, spawn_http_stub, StubResponse};

    #[test]
    fn parse_reply_defaults_missing_or_empty_reply() {
        assert_eq!(parse_reply(r#"{"reply":"Yes."}"#).expect("reply"), "Yes.");
        assert_eq!(parse_reply(r#"{"reply":""}"#).expect("reply"), NO_RESPONSE_REPLY);
        assert_eq!(parse_reply(r#"{}"#).expect("reply"), NO_RESPONSE_REPLY);
        assert!(matches!(
            parse_reply("<html>oops</html>"),
            Err(CompletionError::Malformed(_))
        ));
    }

    #[test]
    fn extract_error_message_collapses_whitespace() {
        assert_eq!(
            extract_error_message(r#"{"error":"GeoAI   Gemini\nAPI failed"}"#).as_deref(),
            Some("GeoAI Gemini API failed")
        );
        assert_eq!(extract_error_message("not json"), None);
        assert_eq!(extract_error_message(r#"{"error":"  "}"#), None);
    }

    #[tokio::test]
    async fn proxy_client_posts_full_history_and_reads_reply() {
        let stub = spawn_http_stub(vec![StubResponse::json(200, r#"{"reply":"Noted."}"#)]).await;
        let client = ProxyCompletionClient::new(no_proxy_client(), stub.url("/api/chat"));

        let history = vec![
            ChatMessage::assistant("Hello!"),
            ChatMessage::user("Tell me about Salt Lake"),
        ];
        let reply = client.complete(&history).await.expect("reply");
        assert_eq!(reply, "Noted.");

        let requests = stub.finish().await;
        assert_eq!(requests.len(), 1);
        assert!(requests[0].request_line.starts_with("POST /api/chat "));
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("json body");
        assert_eq!(
            body,
            serde_json::json!({
                "messages": [
                    {"role": "assistant", "text": "Hello!"},
                    {"role": "user", "text": "Tell me about Salt Lake"}
                ]
            })
        );
    }

    #[tokio::test]
    async fn proxy_client_surfaces_error_status() {
        let stub = spawn_http_stub(vec![StubResponse::json(
            500,
            r#"{"error":"GeoAI Gemini API failed"}"#,
        )])
        .await;
        let client = ProxyCompletionClient::new(no_proxy_client(), stub.url("/api/chat"));

        let err = client
            .complete(&[ChatMessage::user("Howrah?")])
            .await
            .expect_err("should fail");
        match err {
            CompletionError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message.as_deref(), Some("GeoAI Gemini API failed"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
        stub.finish().await;
    }
}

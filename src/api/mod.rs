//! Wire payloads exchanged with the chat proxy, the generateContent upstream
//! and the forecasting backend.

use serde::{Deserialize, Serialize};

use crate::core::message::ChatMessage;

pub mod forecast;
pub mod gemini;

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// Successful proxy response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub reply: Option<String>,
}

/// Failed proxy response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReply {
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatReply {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
        }
    }
}

impl ErrorReply {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
        }
    }
}

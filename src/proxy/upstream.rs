use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::gemini::{GenerateContentRequest, GenerateContentResponse};

#[derive(Debug)]
pub enum UpstreamError {
    /// The upstream could not be reached.
    Transport(reqwest::Error),
    /// The upstream body was not JSON at all.
    InvalidBody(serde_json::Error),
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::Transport(err) => write!(f, "upstream request failed: {err}"),
            UpstreamError::InvalidBody(err) => write!(f, "upstream returned invalid JSON: {err}"),
        }
    }
}

impl StdError for UpstreamError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            UpstreamError::Transport(err) => Some(err),
            UpstreamError::InvalidBody(err) => Some(err),
        }
    }
}

/// A model that turns one prompt into one reply.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError>;
}

/// generateContent-style HTTP upstream.
pub struct GeminiBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    fallback_reply: String,
}

impl GeminiBackend {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: Option<String>,
        fallback_reply: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            fallback_reply: fallback_reply.into(),
        }
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&GenerateContentRequest::single_turn(prompt));
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await.map_err(UpstreamError::Transport)?;
        let status = response.status();
        let body = response.text().await.map_err(UpstreamError::Transport)?;
        if !status.is_success() {
            warn!(%status, "upstream answered with an error status");
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(UpstreamError::InvalidBody)?;
        match parsed.first_text() {
            Some(text) => Ok(text.to_string()),
            None => {
                debug!("upstream response had no candidate text; using fallback reply");
                Ok(self.fallback_reply.clone())
            }
        }
    }
}

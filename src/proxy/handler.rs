use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, error, warn};

use super::upstream::UpstreamError;
use super::ProxyState;
use crate::api::{ChatReply, ChatRequest, ErrorReply};

pub const UPSTREAM_FAILURE: &str = "GeoAI Gemini API failed";

/// Where a reply came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyReply {
    KnownLocation { location: String, reply: String },
    Generated(String),
}

impl ProxyReply {
    pub fn into_text(self) -> String {
        match self {
            ProxyReply::KnownLocation { reply, .. } => reply,
            ProxyReply::Generated(text) => text,
        }
    }
}

/// Allow-list lookup. No I/O.
pub fn lookup_known_location(state: &ProxyState, text: &str) -> Option<ProxyReply> {
    state
        .known_locations
        .find_in(text)
        .map(|location| ProxyReply::KnownLocation {
            location: location.to_string(),
            reply: state.known_location_reply.clone(),
        })
}

pub fn build_prompt(system_prefix: &str, user_text: &str) -> String {
    format!("{system_prefix}\nUser query: {user_text}")
}

/// Lookup first; otherwise one single-turn call to the upstream.
pub async fn resolve_reply(state: &ProxyState, text: &str) -> Result<ProxyReply, UpstreamError> {
    if let Some(reply) = lookup_known_location(state, text) {
        return Ok(reply);
    }
    let prompt = build_prompt(&state.system_prefix, text);
    state.backend.generate(&prompt).await.map(ProxyReply::Generated)
}

/// `POST /api/chat`
pub async fn chat(State(state): State<Arc<ProxyState>>, body: Bytes) -> Response {
    let request: ChatRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            warn!("rejecting malformed chat request: {err}");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorReply::new(format!("invalid chat request: {err}"))),
            )
                .into_response();
        }
    };

    let latest = request
        .messages
        .last()
        .map(|message| message.text.as_str())
        .unwrap_or_default();

    match resolve_reply(&state, latest).await {
        Ok(reply) => {
            if let ProxyReply::KnownLocation { location, .. } = &reply {
                debug!(location = %location, "answered from known locations");
            }
            (StatusCode::OK, Json(ChatReply::new(reply.into_text()))).into_response()
        }
        Err(err) => {
            error!("GeoAI upstream error: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorReply::new(UPSTREAM_FAILURE)),
            )
                .into_response()
        }
    }
}

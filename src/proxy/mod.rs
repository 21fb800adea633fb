//! Chat proxy service.
//!
//! `POST /api/chat` receives the client's whole conversation but only looks
//! at the latest turn. Messages that mention a known location are answered
//! locally; everything else becomes a single-turn prompt for the upstream
//! model.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::core::config::ProxyConfig;

pub mod allow_list;
pub mod handler;
pub mod upstream;

use allow_list::KnownLocations;
use upstream::GenerativeBackend;

pub const CHAT_ROUTE: &str = "/api/chat";

pub struct ProxyState {
    pub known_locations: KnownLocations,
    pub known_location_reply: String,
    pub system_prefix: String,
    pub backend: Arc<dyn GenerativeBackend>,
}

impl ProxyState {
    pub fn from_config(config: &ProxyConfig, backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            known_locations: KnownLocations::new(config.known_locations()),
            known_location_reply: config.known_location_reply().to_string(),
            system_prefix: config.system_prefix().to_string(),
            backend,
        }
    }
}

pub fn router(state: Arc<ProxyState>) -> Router {
    Router::new()
        .route(CHAT_ROUTE, post(handler::chat))
        .with_state(state)
}

/// Accept connections on `listener` until `shutdown` is cancelled.
pub async fn serve(
    listener: TcpListener,
    state: Arc<ProxyState>,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let addr: Option<SocketAddr> = listener.local_addr().ok();
    if let Some(addr) = addr {
        info!(%addr, route = CHAT_ROUTE, "chat proxy listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

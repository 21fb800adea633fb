use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::core::config::Config;
use crate::proxy::upstream::GeminiBackend;
use crate::proxy::{self, ProxyState};

pub async fn run_serve(config: &Config, bind: Option<String>) -> Result<(), Box<dyn Error>> {
    let proxy_config = &config.proxy;
    let key_env = proxy_config.api_key_env();
    let api_key = std::env::var(key_env)
        .ok()
        .filter(|key| !key.trim().is_empty());
    if api_key.is_none() {
        warn!("{key_env} is not set; upstream requests will be sent without a key");
    }

    let backend = GeminiBackend::new(
        reqwest::Client::new(),
        proxy_config.upstream_url(),
        api_key,
        proxy_config.fallback_reply(),
    );
    let state = Arc::new(ProxyState::from_config(proxy_config, Arc::new(backend)));

    let addr = bind.unwrap_or_else(|| proxy_config.bind().to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|err| format!("failed to bind {addr}: {err}"))?;
    println!("GeoAI proxy listening on http://{}{}", listener.local_addr()?, proxy::CHAT_ROUTE);

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down proxy");
            on_signal.cancel();
        }
    });

    proxy::serve(listener, state, shutdown).await?;
    Ok(())
}

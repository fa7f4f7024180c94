mod error;
mod routes;

use crate::config::Config;
use crate::media::{StreamProxy, VideoResolver};
use anyhow::{Context, Result};
use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared state injected into every handler. Immutable after startup;
/// requests never coordinate with each other.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<VideoResolver>,
    pub proxy: StreamProxy,
}

pub fn router(state: AppState) -> Router {
    // Browser callers come from arbitrary origins; preflight OPTIONS is
    // answered here without reaching any handler.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/video", post(routes::video))
        .route("/download", get(routes::download))
        .route("/health", get(routes::health))
        .with_state(state)
        .layer(cors)
}

pub async fn run(config: Config) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.upstream.timeout_secs))
        .build()
        .context("Failed to create HTTP client")?;

    let state = AppState {
        resolver: Arc::new(VideoResolver::new(client.clone(), &config.upstream)),
        proxy: StreamProxy::new(client, &config.upstream),
    };

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
    }
}

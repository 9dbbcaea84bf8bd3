//! Livecraft Relay Server
//!
//! Accepts chat transcripts from the CLI, forwards them to an
//! OpenAI-compatible upstream with the file-block system prompt and relays
//! the streamed reply as `data:` records.

mod handlers;
mod services;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use services::{UpstreamClient, UpstreamConfig};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Livecraft Relay v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = load_config();
    info!(
        "Config loaded: bind={}, upstream={}, model={}",
        config.bind_address, config.upstream.url, config.upstream.default_model
    );

    let state = AppState {
        upstream: Arc::new(UpstreamClient::new(config.upstream)),
    };

    let app = router(state);

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Server listening on {}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/chat", post(handlers::chat::chat))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Clone)]
struct Config {
    bind_address: String,
    upstream: UpstreamConfig,
}

fn load_config() -> Config {
    let bind_address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    let mut upstream = UpstreamConfig::default();
    if let Ok(url) = std::env::var("UPSTREAM_URL") {
        upstream.url = url;
    }
    if let Ok(model) = std::env::var("DEFAULT_MODEL") {
        upstream.default_model = model;
    }
    upstream.api_key = std::env::var("UPSTREAM_API_KEY")
        .or_else(|_| std::env::var("OPENROUTER_API_KEY"))
        .ok()
        .filter(|k| !k.trim().is_empty());

    if upstream.api_key.is_none() {
        warn!("UPSTREAM_API_KEY not set, chat requests will fail");
    }

    Config {
        bind_address,
        upstream,
    }
}

//! Katan game server.

use katan_core::GameConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod protocol;
mod registry;
mod server;

use registry::GameRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse address from env or use default
    let addr: SocketAddr = std::env::var("SERVER_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()?;

    // Optional rule overrides as JSON, e.g. {"points_to_win": 12}
    let config = match std::env::var("KATAN_RULES") {
        Ok(json) => GameConfig::from_json(&json)?,
        Err(_) => GameConfig::default(),
    };

    info!(?config, "Starting Katan server...");

    let registry = Arc::new(GameRegistry::new(config));

    server::run_server(addr, registry).await
}

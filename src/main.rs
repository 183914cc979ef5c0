//! Chat Completion Relay
//!
//! A stateless relay built with Tokio and Axum that forwards chat-completion
//! traffic to one upstream endpoint.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                  CHAT RELAY                      │
//!                        │                                                  │
//!     Client Request     │  ┌──────────┐   ┌──────────┐   ┌─────────────┐  │
//!     ───────────────────┼─▶│relay key │──▶│  route   │──▶│ credential  │  │
//!                        │  │  gate    │   │  table   │   │  resolver   │  │
//!                        │  └──────────┘   └──────────┘   └──────┬──────┘  │
//!                        │                                       │         │
//!                        │                                       ▼         │
//!     Client Response    │  ┌──────────────────┐         ┌─────────────┐   │
//!     ◀──────────────────┼──│  response relay  │◀────────│  upstream   │◀──┼──── Upstream
//!                        │  │ stream / buffer  │         │ dispatcher  │   │     API
//!                        │  └──────────────────┘         └─────────────┘   │
//!                        └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use tokio::net::TcpListener;

use chat_relay::config::{load_config, RelayArgs};
use chat_relay::lifecycle::{signals, Shutdown};
use chat_relay::observability::{logging, metrics};
use chat_relay::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the process environment still applies.
    dotenvy::dotenv().ok();

    let args = RelayArgs::parse();
    let config = load_config(args)?;

    logging::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "chat-relay starting"
    );

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        target_api = %config.target.chat_completions_url(),
        timeout_secs = config.timeout.as_secs(),
        relay_key_enabled = config.relay_api_key.is_some(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    if let Some(addr) = config.observability.metrics_address {
        metrics::init_metrics(addr);
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

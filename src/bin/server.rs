//! Realtime Pong relay server.
//!
//! Pairs two WebSocket connections into a room and relays gameplay
//! events between them.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server -- --store redis
//! ```

use clap::Parser;

use pong_relay_rs::{config::ServerConfig, logger::setup_logger};

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    // Run the server
    if let Err(e) = pong_relay_rs::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

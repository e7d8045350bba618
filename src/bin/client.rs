//! Headless Pong client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin client -- --game AB12CD34
//! ```

use clap::Parser;

use pong_relay_rs::{config::ClientConfig, logger::setup_logger};

#[tokio::main]
async fn main() {
    let config = ClientConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    // Run the client
    if let Err(e) = pong_relay_rs::run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}

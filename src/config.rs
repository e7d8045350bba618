//! Command line configuration for the server and client binaries.

use std::time::Duration;

use clap::{Parser, ValueEnum};

/// Session store backend selection.
///
/// `Memory` is a degraded fallback for local development: records live
/// only as long as the process. `Redis` is the design target and the
/// only backend that survives a relay restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    Memory,
    Redis,
}

/// Relay server configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "server", about = "Realtime Pong relay server")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    pub listen: String,

    /// Session store backend
    #[arg(long, value_enum, default_value_t = StoreBackend::Memory)]
    pub store: StoreBackend,

    /// Redis connection URL (used when --store redis)
    #[arg(long, default_value = "redis://127.0.0.1:6379")]
    pub redis_url: String,

    /// Player session TTL in seconds
    #[arg(long, default_value_t = 3600)]
    pub session_ttl_secs: u64,

    /// Room TTL in seconds (refreshed on every relayed gameplay event)
    #[arg(long, default_value_t = 7200)]
    pub room_ttl_secs: u64,
}

impl ServerConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn room_ttl(&self) -> Duration {
        Duration::from_secs(self.room_ttl_secs)
    }
}

/// Headless demo client configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "client", about = "Headless Pong client")]
pub struct ClientConfig {
    /// Relay server WebSocket URL
    #[arg(long, default_value = "ws://127.0.0.1:3000/ws")]
    pub url: String,

    /// Room code to join; omit to create a new room
    #[arg(long)]
    pub game: Option<String>,
}

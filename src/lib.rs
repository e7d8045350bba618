//! Two-player realtime Pong relay library.
//!
//! This library provides the relay server (room lifecycle, connection
//! admission, event fan-out over WebSocket) and the client-side match
//! engine that keeps one participant's simulation authoritative.

pub mod client;
pub mod config;
pub mod domain;
pub mod game;
pub mod infrastructure;
pub mod logger;
pub mod server;
pub mod time;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use client::run_client;
pub use server::run_server;

//! Server state and connection registry.

use serde::Deserialize;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, mpsc};

use crate::{domain::SessionStore, usecase::RoomLifecycle};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Room code to join; absent to create a new room
    pub game: Option<String>,
}

/// Live occupant information
pub struct OccupantInfo {
    /// Message sender channel
    pub sender: mpsc::UnboundedSender<String>,
    /// Unix timestamp when connected (milliseconds)
    pub connected_at: i64,
}

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub store: Arc<dyn SessionStore>,
    /// Room lifecycle operations shared by all handlers
    pub lifecycle: RoomLifecycle,
    /// Backend label reported by the health endpoint
    pub backend: &'static str,
    /// Player session TTL
    pub session_ttl: std::time::Duration,
    /// WebSocket sender channels per room, keyed by connection id
    pub rooms: Arc<Mutex<HashMap<String, HashMap<String, OccupantInfo>>>>,
}

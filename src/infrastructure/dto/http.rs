//! HTTP DTOs for the diagnostic surface.

use serde::{Deserialize, Serialize};

use crate::domain::Room;

/// Liveness probe payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDto {
    pub status: String,
    pub store: String,
    pub active_games: usize,
    pub active_players: usize,
    pub timestamp: i64,
}

/// Error payload returned when the store is unreachable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnhealthyDto {
    pub status: String,
    pub store: String,
    pub error: String,
    pub timestamp: i64,
}

/// One room record in the listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub room_id: String,
    pub first_connection_id: String,
    pub second_connection_id: Option<String>,
    pub second_connected: bool,
    pub created_at: i64,
    pub last_activity_at: i64,
}

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.code.as_str().to_string(),
            first_connection_id: room.first_connection_id.as_str().to_string(),
            second_connection_id: room
                .second_connection_id
                .as_ref()
                .map(|id| id.as_str().to_string()),
            second_connected: room.second_connected,
            created_at: room.created_at.value(),
            last_activity_at: room.last_activity_at.value(),
        }
    }
}

/// Room listing payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameListDto {
    pub total_games: usize,
    pub games: Vec<RoomSummaryDto>,
}

//! Core domain models for the Pong relay.

use serde::{Deserialize, Serialize};

use super::{
    error::RoomError,
    value_object::{ConnectionId, Role, RoomCode, Timestamp},
};

/// Represents one match's pairing and metadata.
///
/// A room holds at most one First and one Second occupant. The record
/// is persisted with a TTL and refreshed on every relayed gameplay
/// event, so idle-but-active rooms are not reaped while truly idle
/// rooms expire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Human-shareable match code
    pub code: RoomCode,
    /// Connection holding the First (authoritative) slot
    pub first_connection_id: ConnectionId,
    /// Connection holding the Second slot, if occupied
    pub second_connection_id: Option<ConnectionId>,
    /// Whether the Second slot is currently connected
    pub second_connected: bool,
    /// Timestamp when the room was created
    pub created_at: Timestamp,
    /// Timestamp of the last relayed gameplay event
    pub last_activity_at: Timestamp,
}

impl Room {
    /// Create a new room with the given connection as First occupant.
    pub fn new(code: RoomCode, first_connection_id: ConnectionId, created_at: Timestamp) -> Self {
        Self {
            code,
            first_connection_id,
            second_connection_id: None,
            second_connected: false,
            created_at,
            last_activity_at: created_at,
        }
    }

    /// Seat a connection in the Second slot.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::RoomFull` if a Second occupant already holds
    /// a live slot.
    pub fn seat_second(
        &mut self,
        connection_id: ConnectionId,
        now: Timestamp,
    ) -> Result<(), RoomError> {
        if self.second_connection_id.is_some() {
            return Err(RoomError::RoomFull);
        }
        self.second_connection_id = Some(connection_id);
        self.second_connected = true;
        self.last_activity_at = now;
        Ok(())
    }

    /// Clear the Second slot, keeping the room so a new Second can
    /// rejoin with the same code.
    pub fn clear_second(&mut self) {
        self.second_connection_id = None;
        self.second_connected = false;
    }

    /// Whether both slots are occupied.
    pub fn is_full(&self) -> bool {
        self.second_connection_id.is_some()
    }

    /// Refresh the activity timestamp.
    pub fn touch(&mut self, now: Timestamp) {
        self.last_activity_at = now;
    }
}

/// Represents one connected participant's role and room membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSession {
    /// Opaque identifier of the connection
    pub connection_id: ConnectionId,
    /// Code of the room this connection is scoped to
    pub room_code: RoomCode,
    /// Role held in the room
    pub role: Role,
    /// Whether the underlying connection is currently admitted
    pub connected: bool,
    /// Timestamp when the participant was admitted
    pub joined_at: Timestamp,
}

impl PlayerSession {
    /// Create a new session for an admitted connection.
    pub fn new(
        connection_id: ConnectionId,
        room_code: RoomCode,
        role: Role,
        joined_at: Timestamp,
    ) -> Self {
        Self {
            connection_id,
            room_code,
            role,
            connected: true,
            joined_at,
        }
    }
}

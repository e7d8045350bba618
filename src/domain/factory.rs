//! Domain factories for creating domain entities and value objects.

use rand::Rng;

use super::{
    error::ValueObjectError,
    value_object::{ConnectionId, ROOM_CODE_LEN, RoomCode},
};

const ROOM_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Factory for generating RoomCode instances.
///
/// Codes are 8 characters drawn uniformly from A-Z0-9, giving a 36^8
/// space. Collision with a live room is treated as negligible and is
/// not re-checked.
pub struct RoomCodeFactory;

impl RoomCodeFactory {
    /// Generate a new random RoomCode.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for
    /// consistency with the domain error handling pattern.
    pub fn generate() -> Result<RoomCode, ValueObjectError> {
        let mut rng = rand::thread_rng();
        let code: String = (0..ROOM_CODE_LEN)
            .map(|_| ROOM_CODE_CHARSET[rng.gen_range(0..ROOM_CODE_CHARSET.len())] as char)
            .collect();
        RoomCode::new(code)
    }
}

/// Factory for generating ConnectionId instances.
///
/// The relay assigns every incoming connection a fresh UUID v4 before
/// admission; the transport has no identifier of its own at that point.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId with a random UUID v4.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for
    /// consistency with the domain error handling pattern.
    pub fn generate() -> Result<ConnectionId, ValueObjectError> {
        let uuid = uuid::Uuid::new_v4();
        ConnectionId::new(uuid.to_string())
    }
}

//! Session store abstraction.
//!
//! The domain layer defines the `SessionStore` trait; the usecase layer
//! depends on it and the infrastructure layer provides the concrete
//! backends (dependency inversion). The store itself holds no protocol
//! logic: it is pure TTL-bearing key-value persistence for the two
//! entity kinds, plus one conditional update used to make concurrent
//! joins race-free.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::{
    entity::{PlayerSession, Room},
    value_object::{ConnectionId, RoomCode, Timestamp},
};

/// Errors surfaced by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or rejected the operation
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    /// A persisted record could not be encoded or decoded
    #[error("failed to encode store record: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Outcome of the atomic Second-slot claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The slot was vacant and is now held by the claimant; the updated
    /// room record is returned
    Claimed(Room),
    /// No room record exists for the code
    NotFound,
    /// A Second occupant already holds a live slot
    Full,
}

/// TTL-bearing key-value persistence for rooms and player sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a room record, (re)stamping its TTL.
    async fn put_room(&self, room: &Room, ttl: Duration) -> Result<(), StoreError>;

    /// Fetch a room record; `None` if absent or expired.
    async fn get_room(&self, code: &RoomCode) -> Result<Option<Room>, StoreError>;

    /// Delete a room record. Deleting an absent record is not an error.
    async fn delete_room(&self, code: &RoomCode) -> Result<(), StoreError>;

    /// Whether a live room record exists for the code.
    async fn room_exists(&self, code: &RoomCode) -> Result<bool, StoreError>;

    /// Atomically seat `connection_id` in the Second slot of the room.
    ///
    /// This is a single conditional update (test-and-set on the Second
    /// slot) so two concurrent joins cannot both observe a vacant slot.
    async fn claim_second_slot(
        &self,
        code: &RoomCode,
        connection_id: &ConnectionId,
        now: Timestamp,
        ttl: Duration,
    ) -> Result<ClaimOutcome, StoreError>;

    /// Persist a player session record, (re)stamping its TTL.
    async fn put_session(&self, session: &PlayerSession, ttl: Duration) -> Result<(), StoreError>;

    /// Fetch a player session; `None` if absent or expired.
    async fn get_session(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<PlayerSession>, StoreError>;

    /// Delete a player session. Deleting an absent record is not an error.
    async fn delete_session(&self, connection_id: &ConnectionId) -> Result<(), StoreError>;

    /// Enumerate all live room records (diagnostic surface).
    async fn list_rooms(&self) -> Result<Vec<Room>, StoreError>;

    /// Count live room records (diagnostic surface).
    async fn count_rooms(&self) -> Result<usize, StoreError>;

    /// Count live session records (diagnostic surface).
    async fn count_sessions(&self) -> Result<usize, StoreError>;

    /// Check store connectivity.
    async fn ping(&self) -> Result<(), StoreError>;
}

//! UseCase: ルームライフサイクル管理
//!
//! ルームの作成・参加・活動更新・解放を担当します。
//! Second の参加はストアに対する単一の条件付き更新（test-and-set）として
//! 実行され、同時参加の競合を排除します。

use std::{sync::Arc, time::Duration};

use crate::{
    domain::{
        ClaimOutcome, ConnectionId, Role, Room, RoomCode, RoomCodeFactory, SessionStore,
        StoreError, Timestamp,
    },
    time::get_unix_timestamp,
};

use super::error::AdmissionError;

/// ルームライフサイクルのユースケース
#[derive(Clone)]
pub struct RoomLifecycle {
    /// Repository（データアクセス層の抽象化）
    store: Arc<dyn SessionStore>,
    /// Room record TTL, refreshed on every relayed gameplay event
    room_ttl: Duration,
}

impl RoomLifecycle {
    /// 新しい RoomLifecycle を作成
    pub fn new(store: Arc<dyn SessionStore>, room_ttl: Duration) -> Self {
        Self { store, room_ttl }
    }

    /// Create a new room with this connection as its First occupant.
    ///
    /// The generated code is 8 uniform-random characters out of a 36^8
    /// space; collision with a live room is treated as negligible and
    /// not re-checked.
    pub async fn create_room(&self, connection_id: &ConnectionId) -> Result<Room, AdmissionError> {
        let code =
            RoomCodeFactory::generate().map_err(|e| AdmissionError::Internal(e.to_string()))?;
        let now = Timestamp::new(get_unix_timestamp());
        let room = Room::new(code, connection_id.clone(), now);
        self.store.put_room(&room, self.room_ttl).await?;
        Ok(room)
    }

    /// Seat this connection in the Second slot of an existing room.
    ///
    /// # Errors
    ///
    /// * `AdmissionError::RoomNotFound` - no room record exists
    /// * `AdmissionError::RoomFull` - a Second occupant already holds a live slot
    pub async fn join_room(
        &self,
        code: &RoomCode,
        connection_id: &ConnectionId,
    ) -> Result<Room, AdmissionError> {
        let now = Timestamp::new(get_unix_timestamp());
        match self
            .store
            .claim_second_slot(code, connection_id, now, self.room_ttl)
            .await?
        {
            ClaimOutcome::Claimed(room) => Ok(room),
            ClaimOutcome::NotFound => Err(AdmissionError::RoomNotFound),
            ClaimOutcome::Full => Err(AdmissionError::RoomFull),
        }
    }

    /// Extend the room TTL and update its activity timestamp.
    ///
    /// Called on every relayed gameplay event so idle-but-active rooms
    /// are not reaped while truly idle rooms expire.
    pub async fn refresh_activity(&self, code: &RoomCode) -> Result<(), StoreError> {
        if let Some(mut room) = self.store.get_room(code).await? {
            room.touch(Timestamp::new(get_unix_timestamp()));
            self.store.put_room(&room, self.room_ttl).await?;
        }
        Ok(())
    }

    /// Release an occupant's slot.
    ///
    /// If First leaves, the room is deleted outright (the match cannot
    /// continue without its authoritative half). If Second leaves, the
    /// slot is cleared but the room is preserved so a new Second can
    /// rejoin with the same code.
    pub async fn release_occupant(&self, code: &RoomCode, role: Role) -> Result<(), StoreError> {
        match role {
            Role::First => self.store.delete_room(code).await,
            Role::Second => {
                if let Some(mut room) = self.store.get_room(code).await? {
                    room.clear_second();
                    self.store.put_room(&room, self.room_ttl).await?;
                }
                Ok(())
            }
        }
    }
}

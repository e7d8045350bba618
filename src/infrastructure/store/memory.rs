//! In-memory session store.
//!
//! HashMap-backed variant of the `SessionStore` trait with lazily
//! enforced TTLs. Records live only as long as the process; this
//! backend is the degraded fallback used for local development and
//! tests, not the design target.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ClaimOutcome, ConnectionId, PlayerSession, Room, RoomCode, RoomError, SessionStore, StoreError,
    Timestamp,
};

struct Expiring<T> {
    value: T,
    expires_at: Instant,
}

impl<T> Expiring<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Default)]
struct Tables {
    rooms: HashMap<String, Expiring<Room>>,
    sessions: HashMap<String, Expiring<PlayerSession>>,
}

/// In-memory `SessionStore` implementation.
///
/// Both record kinds live under one mutex, which also makes the
/// Second-slot claim a single atomic update.
pub struct InMemorySessionStore {
    tables: Mutex<Tables>,
}

impl InMemorySessionStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn put_room(&self, room: &Room, ttl: Duration) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        tables.rooms.insert(
            room.code.as_str().to_string(),
            Expiring::new(room.clone(), ttl),
        );
        Ok(())
    }

    async fn get_room(&self, code: &RoomCode) -> Result<Option<Room>, StoreError> {
        let mut tables = self.tables.lock().await;
        match tables.rooms.get(code.as_str()) {
            Some(entry) if !entry.is_expired() => Ok(Some(entry.value.clone())),
            Some(_) => {
                tables.rooms.remove(code.as_str());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete_room(&self, code: &RoomCode) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        tables.rooms.remove(code.as_str());
        Ok(())
    }

    async fn room_exists(&self, code: &RoomCode) -> Result<bool, StoreError> {
        Ok(self.get_room(code).await?.is_some())
    }

    async fn claim_second_slot(
        &self,
        code: &RoomCode,
        connection_id: &ConnectionId,
        now: Timestamp,
        ttl: Duration,
    ) -> Result<ClaimOutcome, StoreError> {
        let mut tables = self.tables.lock().await;
        let Some(entry) = tables.rooms.get(code.as_str()) else {
            return Ok(ClaimOutcome::NotFound);
        };
        if entry.is_expired() {
            tables.rooms.remove(code.as_str());
            return Ok(ClaimOutcome::NotFound);
        }

        let mut room = entry.value.clone();
        match room.seat_second(connection_id.clone(), now) {
            Ok(()) => {
                tables.rooms.insert(
                    code.as_str().to_string(),
                    Expiring::new(room.clone(), ttl),
                );
                Ok(ClaimOutcome::Claimed(room))
            }
            Err(RoomError::RoomFull) => Ok(ClaimOutcome::Full),
            Err(RoomError::RoomNotFound) => Ok(ClaimOutcome::NotFound),
        }
    }

    async fn put_session(&self, session: &PlayerSession, ttl: Duration) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        tables.sessions.insert(
            session.connection_id.as_str().to_string(),
            Expiring::new(session.clone(), ttl),
        );
        Ok(())
    }

    async fn get_session(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<PlayerSession>, StoreError> {
        let mut tables = self.tables.lock().await;
        match tables.sessions.get(connection_id.as_str()) {
            Some(entry) if !entry.is_expired() => Ok(Some(entry.value.clone())),
            Some(_) => {
                tables.sessions.remove(connection_id.as_str());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete_session(&self, connection_id: &ConnectionId) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        tables.sessions.remove(connection_id.as_str());
        Ok(())
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, StoreError> {
        let mut tables = self.tables.lock().await;
        tables.rooms.retain(|_, entry| !entry.is_expired());
        Ok(tables.rooms.values().map(|e| e.value.clone()).collect())
    }

    async fn count_rooms(&self) -> Result<usize, StoreError> {
        Ok(self.list_rooms().await?.len())
    }

    async fn count_sessions(&self) -> Result<usize, StoreError> {
        let mut tables = self.tables.lock().await;
        tables.sessions.retain(|_, entry| !entry.is_expired());
        Ok(tables.sessions.len())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, RoomCodeFactory};

    const TTL: Duration = Duration::from_secs(60);

    fn connection_id(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn make_room(first: &str) -> Room {
        Room::new(
            RoomCodeFactory::generate().unwrap(),
            connection_id(first),
            Timestamp::new(1000),
        )
    }

    #[tokio::test]
    async fn test_put_get_delete_room() {
        // テスト項目: Room の保存・取得・削除ができる
        // given (前提条件):
        let store = InMemorySessionStore::new();
        let room = make_room("a");

        // when (操作):
        store.put_room(&room, TTL).await.unwrap();

        // then (期待する結果):
        assert_eq!(store.get_room(&room.code).await.unwrap(), Some(room.clone()));
        assert!(store.room_exists(&room.code).await.unwrap());

        store.delete_room(&room.code).await.unwrap();
        assert_eq!(store.get_room(&room.code).await.unwrap(), None);
        assert!(!store.room_exists(&room.code).await.unwrap());
    }

    #[tokio::test]
    async fn test_room_ttl_expiry() {
        // テスト項目: TTL を過ぎた Room は取得できない
        // given (前提条件):
        let store = InMemorySessionStore::new();
        let room = make_room("a");
        store.put_room(&room, Duration::ZERO).await.unwrap();

        // when (操作):
        let fetched = store.get_room(&room.code).await.unwrap();

        // then (期待する結果):
        assert_eq!(fetched, None);
        assert_eq!(store.count_rooms().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_claim_second_slot_success() {
        // テスト項目: 空いている Second スロットを獲得できる
        // given (前提条件):
        let store = InMemorySessionStore::new();
        let room = make_room("a");
        store.put_room(&room, TTL).await.unwrap();

        // when (操作):
        let outcome = store
            .claim_second_slot(&room.code, &connection_id("b"), Timestamp::new(2000), TTL)
            .await
            .unwrap();

        // then (期待する結果):
        let ClaimOutcome::Claimed(updated) = outcome else {
            panic!("expected Claimed, got {outcome:?}");
        };
        assert_eq!(updated.second_connection_id, Some(connection_id("b")));
        assert!(updated.second_connected);

        // 永続化された記録にも反映されている
        let stored = store.get_room(&room.code).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_claim_second_slot_not_found() {
        // テスト項目: 存在しない Room の獲得は NotFound になる
        // given (前提条件):
        let store = InMemorySessionStore::new();
        let code = RoomCodeFactory::generate().unwrap();

        // when (操作):
        let outcome = store
            .claim_second_slot(&code, &connection_id("b"), Timestamp::new(2000), TTL)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(outcome, ClaimOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_claim_second_slot_full() {
        // テスト項目: 埋まっているスロットの獲得は Full になる
        // given (前提条件):
        let store = InMemorySessionStore::new();
        let room = make_room("a");
        store.put_room(&room, TTL).await.unwrap();
        store
            .claim_second_slot(&room.code, &connection_id("b"), Timestamp::new(2000), TTL)
            .await
            .unwrap();

        // when (操作):
        let outcome = store
            .claim_second_slot(&room.code, &connection_id("c"), Timestamp::new(3000), TTL)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(outcome, ClaimOutcome::Full);

        // 先の占有者が保持されている
        let stored = store.get_room(&room.code).await.unwrap().unwrap();
        assert_eq!(stored.second_connection_id, Some(connection_id("b")));
    }

    #[tokio::test]
    async fn test_concurrent_claims_admit_exactly_one() {
        // テスト項目: 同時 join で Second スロットを得るのは1接続のみ
        // given (前提条件):
        let store = std::sync::Arc::new(InMemorySessionStore::new());
        let room = make_room("a");
        store.put_room(&room, TTL).await.unwrap();

        // when (操作): 10 接続が同時に獲得を試みる
        let mut handles = Vec::new();
        for i in 0..10 {
            let store = store.clone();
            let code = room.code.clone();
            handles.push(tokio::spawn(async move {
                store
                    .claim_second_slot(
                        &code,
                        &ConnectionId::new(format!("claimant-{i}")).unwrap(),
                        Timestamp::new(2000),
                        TTL,
                    )
                    .await
                    .unwrap()
            }));
        }

        let mut claimed = 0;
        let mut full = 0;
        for handle in handles {
            match handle.await.unwrap() {
                ClaimOutcome::Claimed(_) => claimed += 1,
                ClaimOutcome::Full => full += 1,
                ClaimOutcome::NotFound => panic!("room should exist"),
            }
        }

        // then (期待する結果):
        assert_eq!(claimed, 1);
        assert_eq!(full, 9);
    }

    #[tokio::test]
    async fn test_put_get_delete_session() {
        // テスト項目: PlayerSession の保存・取得・削除ができる
        // given (前提条件):
        let store = InMemorySessionStore::new();
        let session = PlayerSession::new(
            connection_id("a"),
            RoomCodeFactory::generate().unwrap(),
            Role::First,
            Timestamp::new(1000),
        );

        // when (操作):
        store.put_session(&session, TTL).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            store.get_session(&session.connection_id).await.unwrap(),
            Some(session.clone())
        );
        assert_eq!(store.count_sessions().await.unwrap(), 1);

        store.delete_session(&session.connection_id).await.unwrap();
        assert_eq!(store.get_session(&session.connection_id).await.unwrap(), None);
        assert_eq!(store.count_sessions().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_session_ttl_expiry() {
        // テスト項目: TTL を過ぎた PlayerSession は取得できない
        // given (前提条件):
        let store = InMemorySessionStore::new();
        let session = PlayerSession::new(
            connection_id("a"),
            RoomCodeFactory::generate().unwrap(),
            Role::Second,
            Timestamp::new(1000),
        );
        store.put_session(&session, Duration::ZERO).await.unwrap();

        // when (操作):
        let fetched = store.get_session(&session.connection_id).await.unwrap();

        // then (期待する結果):
        assert_eq!(fetched, None);
    }

    #[tokio::test]
    async fn test_list_rooms() {
        // テスト項目: 生存している Room のみが列挙される
        // given (前提条件):
        let store = InMemorySessionStore::new();
        let live = make_room("a");
        let expired = make_room("b");
        store.put_room(&live, TTL).await.unwrap();
        store.put_room(&expired, Duration::ZERO).await.unwrap();

        // when (操作):
        let rooms = store.list_rooms().await.unwrap();

        // then (期待する結果):
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].code, live.code);
    }
}

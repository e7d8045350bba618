//! Redis-backed session store.
//!
//! Rooms are persisted under `game:<code>` and player sessions under
//! `player:<connection_id>`, both as JSON values with a Redis-enforced
//! TTL (`SET .. EX`). The Second-slot claim runs as a Lua script so the
//! read-check-write happens atomically inside Redis.

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Script, aio::ConnectionManager};

use crate::domain::{
    ClaimOutcome, ConnectionId, PlayerSession, Room, RoomCode, SessionStore, StoreError, Timestamp,
};

const ROOM_PREFIX: &str = "game:";
const PLAYER_PREFIX: &str = "player:";

/// Test-and-set on the Second slot: seats the claimant only if no
/// Second occupant holds the slot, restamping the TTL. Returns the
/// updated record, or a status string on the two failure outcomes.
const CLAIM_SECOND_SLOT_SCRIPT: &str = r#"
local raw = redis.call('GET', KEYS[1])
if not raw then
    return 'not_found'
end
local room = cjson.decode(raw)
if room.secondConnectionId and room.secondConnectionId ~= cjson.null then
    return 'full'
end
room.secondConnectionId = ARGV[1]
room.secondConnected = true
room.lastActivityAt = tonumber(ARGV[2])
local encoded = cjson.encode(room)
redis.call('SET', KEYS[1], encoded, 'EX', tonumber(ARGV[3]))
return encoded
"#;

fn room_key(code: &RoomCode) -> String {
    format!("{ROOM_PREFIX}{}", code.as_str())
}

fn session_key(connection_id: &ConnectionId) -> String {
    format!("{PLAYER_PREFIX}{}", connection_id.as_str())
}

fn backend_err(e: redis::RedisError) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

/// Redis `SessionStore` implementation.
#[derive(Clone)]
pub struct RedisSessionStore {
    connection: ConnectionManager,
    claim_script: Script,
}

impl RedisSessionStore {
    /// Connect to Redis and build the store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the URL is invalid or the
    /// initial connection cannot be established.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(backend_err)?;
        let connection = ConnectionManager::new(client).await.map_err(backend_err)?;
        Ok(Self {
            connection,
            claim_script: Script::new(CLAIM_SECOND_SLOT_SCRIPT),
        })
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut con = self.connection.clone();
        let keys: Vec<String> = con.keys(format!("{prefix}*")).await.map_err(backend_err)?;
        Ok(keys)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put_room(&self, room: &Room, ttl: Duration) -> Result<(), StoreError> {
        let mut con = self.connection.clone();
        let json = serde_json::to_string(room)?;
        let _: () = con
            .set_ex(room_key(&room.code), json, ttl_secs(ttl))
            .await
            .map_err(backend_err)?;
        Ok(())
    }

    async fn get_room(&self, code: &RoomCode) -> Result<Option<Room>, StoreError> {
        let mut con = self.connection.clone();
        let raw: Option<String> = con.get(room_key(code)).await.map_err(backend_err)?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn delete_room(&self, code: &RoomCode) -> Result<(), StoreError> {
        let mut con = self.connection.clone();
        let _: () = con.del(room_key(code)).await.map_err(backend_err)?;
        Ok(())
    }

    async fn room_exists(&self, code: &RoomCode) -> Result<bool, StoreError> {
        let mut con = self.connection.clone();
        let exists: bool = con.exists(room_key(code)).await.map_err(backend_err)?;
        Ok(exists)
    }

    async fn claim_second_slot(
        &self,
        code: &RoomCode,
        connection_id: &ConnectionId,
        now: Timestamp,
        ttl: Duration,
    ) -> Result<ClaimOutcome, StoreError> {
        let mut con = self.connection.clone();
        let result: String = self
            .claim_script
            .key(room_key(code))
            .arg(connection_id.as_str())
            .arg(now.value())
            .arg(ttl_secs(ttl))
            .invoke_async(&mut con)
            .await
            .map_err(backend_err)?;

        match result.as_str() {
            "not_found" => Ok(ClaimOutcome::NotFound),
            "full" => Ok(ClaimOutcome::Full),
            json => Ok(ClaimOutcome::Claimed(serde_json::from_str(json)?)),
        }
    }

    async fn put_session(&self, session: &PlayerSession, ttl: Duration) -> Result<(), StoreError> {
        let mut con = self.connection.clone();
        let json = serde_json::to_string(session)?;
        let _: () = con
            .set_ex(session_key(&session.connection_id), json, ttl_secs(ttl))
            .await
            .map_err(backend_err)?;
        Ok(())
    }

    async fn get_session(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<PlayerSession>, StoreError> {
        let mut con = self.connection.clone();
        let raw: Option<String> = con
            .get(session_key(connection_id))
            .await
            .map_err(backend_err)?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn delete_session(&self, connection_id: &ConnectionId) -> Result<(), StoreError> {
        let mut con = self.connection.clone();
        let _: () = con
            .del(session_key(connection_id))
            .await
            .map_err(backend_err)?;
        Ok(())
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, StoreError> {
        let mut con = self.connection.clone();
        let mut rooms = Vec::new();
        for key in self.keys_with_prefix(ROOM_PREFIX).await? {
            // A key can expire between KEYS and GET; skip it silently.
            let raw: Option<String> = con.get(&key).await.map_err(backend_err)?;
            if let Some(json) = raw {
                rooms.push(serde_json::from_str(&json)?);
            }
        }
        Ok(rooms)
    }

    async fn count_rooms(&self) -> Result<usize, StoreError> {
        Ok(self.keys_with_prefix(ROOM_PREFIX).await?.len())
    }

    async fn count_sessions(&self) -> Result<usize, StoreError> {
        Ok(self.keys_with_prefix(PLAYER_PREFIX).await?.len())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut con = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut con)
            .await
            .map_err(backend_err)?;
        Ok(())
    }
}

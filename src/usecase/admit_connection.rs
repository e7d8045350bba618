//! UseCase: 接続許可処理（Connection Gate）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AdmitConnectionUseCase::execute() メソッド
//! - ルームコードの有無によるロール解決とセッション永続化
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：コードなし接続は新規ルームの First になる
//! - 不正なコードでの参加が拒否され、セッションが作られないことを保証
//! - ストア障害時に許可が拒否されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ルーム作成 / 既存ルームへの参加
//! - 異常系：RoomNotFound / RoomFull / ストア障害
//! - エッジケース：満員ルームへの3本目の接続

use std::{sync::Arc, time::Duration};

use crate::{
    domain::{ConnectionId, PlayerSession, Role, Room, RoomCode, SessionStore, Timestamp},
    time::get_unix_timestamp,
};

use super::{error::AdmissionError, room_lifecycle::RoomLifecycle};

/// Result of a successful admission: the connection is now scoped to
/// the room under the assigned role.
#[derive(Debug, Clone)]
pub struct Admission {
    pub room: Room,
    pub role: Role,
}

impl Admission {
    /// Whether the Second slot is occupied, i.e. the value of the
    /// post-admission `peerPresence` broadcast.
    pub fn peer_present(&self) -> bool {
        self.room.second_connected
    }
}

/// 接続許可のユースケース
pub struct AdmitConnectionUseCase {
    lifecycle: RoomLifecycle,
    /// Repository（データアクセス層の抽象化）
    store: Arc<dyn SessionStore>,
    /// Player session TTL
    session_ttl: Duration,
}

impl AdmitConnectionUseCase {
    /// 新しい AdmitConnectionUseCase を作成
    pub fn new(lifecycle: RoomLifecycle, store: Arc<dyn SessionStore>, session_ttl: Duration) -> Self {
        Self {
            lifecycle,
            store,
            session_ttl,
        }
    }

    /// 接続許可を実行
    ///
    /// Resolves the role from the optional room code: absent means a
    /// fresh room with this connection as First; present means joining
    /// the Second slot. On success a PlayerSession is persisted. On any
    /// failure the connection is never scoped to a room and no session
    /// record is created.
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 接続の ID（Domain Model）
    /// * `requested` - 参加したいルームコード（省略時は新規作成）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        requested: Option<RoomCode>,
    ) -> Result<Admission, AdmissionError> {
        let (room, role) = match requested {
            None => {
                let room = self.lifecycle.create_room(&connection_id).await?;
                (room, Role::First)
            }
            Some(code) => {
                let room = self.lifecycle.join_room(&code, &connection_id).await?;
                (room, Role::Second)
            }
        };

        let session = PlayerSession::new(
            connection_id,
            room.code.clone(),
            role,
            Timestamp::new(get_unix_timestamp()),
        );
        self.store.put_session(&session, self.session_ttl).await?;

        Ok(Admission { room, role })
    }
}

//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUseCase の lookup() / complete() メソッド
//! - 切断時のロール別のルーム解放とセッション削除
//!
//! ### なぜこのテストが必要か
//! - First の切断でルームが削除されることを保証
//! - Second の切断でルームが維持され再参加可能になることを保証
//! - セッションのない接続（許可前の切断や二重掃除）が no-op であることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：First / Second それぞれの切断
//! - エッジケース：セッションが存在しない切断
//!
//! 通知は complete() より先に行う必要があります（ピアが再照会しうる
//! ルーム記録が消える前に、切断を知らせるため）。

use std::sync::Arc;

use crate::domain::{ConnectionId, Role, RoomCode, SessionStore, StoreError};

use super::room_lifecycle::RoomLifecycle;

/// A departing occupant: which room they leave and under which role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room_code: RoomCode,
    pub role: Role,
}

/// 切断のユースケース
pub struct DisconnectUseCase {
    lifecycle: RoomLifecycle,
    /// Repository（データアクセス層の抽象化）
    store: Arc<dyn SessionStore>,
}

impl DisconnectUseCase {
    /// 新しい DisconnectUseCase を作成
    pub fn new(lifecycle: RoomLifecycle, store: Arc<dyn SessionStore>) -> Self {
        Self { lifecycle, store }
    }

    /// Look up the departing connection's session.
    ///
    /// Returns `None` if no session exists (already cleaned up, or the
    /// connection was never admitted); in that case nothing further
    /// happens. The caller broadcasts the peer-disconnected
    /// notification before calling [`complete`](Self::complete).
    pub async fn lookup(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<Departure>, StoreError> {
        Ok(self
            .store
            .get_session(connection_id)
            .await?
            .map(|session| Departure {
                room_code: session.room_code,
                role: session.role,
            }))
    }

    /// Tear down the departing occupant's records.
    ///
    /// Releases the room slot (deleting the room outright when First
    /// leaves) and deletes the player session.
    pub async fn complete(
        &self,
        connection_id: &ConnectionId,
        departure: &Departure,
    ) -> Result<(), StoreError> {
        self.lifecycle
            .release_occupant(&departure.room_code, departure.role)
            .await?;
        self.store.delete_session(connection_id).await
    }
}

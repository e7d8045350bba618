//! UseCase: ゲームイベント中継処理
//!
//! ペイロードを解釈しないステートレスなファンアウト。中継のたびに
//! ルームの活動タイムスタンプを更新します。活動更新の失敗は
//! アイドル期限の猶予が縮むだけでマッチ状態を壊さないため、
//! ログに残して握りつぶします。

use crate::{
    domain::RoomCode,
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
};

use super::room_lifecycle::RoomLifecycle;

/// イベント中継のユースケース
pub struct RelayEventUseCase {
    lifecycle: RoomLifecycle,
}

impl RelayEventUseCase {
    /// 新しい RelayEventUseCase を作成
    pub fn new(lifecycle: RoomLifecycle) -> Self {
        Self { lifecycle }
    }

    /// ゲームイベントを中継形式に変換し、ルームの活動を更新
    ///
    /// The returned event is re-emitted verbatim to every other
    /// occupant of the sender's room; the relay never buffers,
    /// reorders, or deduplicates.
    pub async fn execute(&self, room_code: &RoomCode, event: &ClientEvent) -> ServerEvent {
        debug_assert!(event.is_gameplay());

        if let Err(e) = self.lifecycle.refresh_activity(room_code).await {
            tracing::warn!("Failed to refresh activity for room '{}': {}", room_code, e);
        }

        ServerEvent::from(event)
    }
}

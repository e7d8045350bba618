//! WebSocket message DTOs for the Pong relay.
//!
//! Both directions use internally tagged JSON (`"type"` discriminator,
//! camelCase). The five gameplay events exist in both enums: the relay
//! re-emits them verbatim without interpreting the payload.

use serde::{Deserialize, Serialize};

use crate::domain::Role;

/// Events a connection sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// First participant's paddle position
    PaddleA { y: f32 },
    /// Second participant's paddle position
    PaddleB { y: f32 },
    /// Authoritative ball position and velocity
    BallState { x: f32, y: f32, vx: f32, vy: f32 },
    /// Authoritative score totals
    ScoreState { score_a: u32, score_b: u32 },
    /// Request to reinitialize the match on both sides
    ResetMatch,
    /// Liveness probe; answered with `pong` to the sender only
    Ping,
}

impl ClientEvent {
    /// Whether this event is one of the five relayed gameplay events
    /// (as opposed to connection housekeeping).
    pub fn is_gameplay(&self) -> bool {
        !matches!(self, ClientEvent::Ping)
    }
}

/// Events the relay sends to connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Room code, sent room-wide after an admission
    RoomId { room_id: String },
    /// Role assignment, sent to the admitted connection only
    Role { role: Role },
    /// Whether the Second slot is occupied, sent room-wide
    PeerPresence { present: bool },
    /// A peer holding `role` was admitted to the room
    PeerConnected { role: Role },
    /// The peer holding `role` left the room
    PeerDisconnected { role: Role },
    /// Reply to a `ping`, sent to the sender only
    Pong,
    // Verbatim re-emission of the gameplay events
    PaddleA { y: f32 },
    PaddleB { y: f32 },
    BallState { x: f32, y: f32, vx: f32, vy: f32 },
    ScoreState { score_a: u32, score_b: u32 },
    ResetMatch,
}

impl From<&ClientEvent> for ServerEvent {
    /// Map a gameplay event to its verbatim relayed form.
    ///
    /// `Ping` has no relayed form; it maps to `Pong` for the sender.
    fn from(event: &ClientEvent) -> Self {
        match *event {
            ClientEvent::PaddleA { y } => ServerEvent::PaddleA { y },
            ClientEvent::PaddleB { y } => ServerEvent::PaddleB { y },
            ClientEvent::BallState { x, y, vx, vy } => ServerEvent::BallState { x, y, vx, vy },
            ClientEvent::ScoreState { score_a, score_b } => {
                ServerEvent::ScoreState { score_a, score_b }
            }
            ClientEvent::ResetMatch => ServerEvent::ResetMatch,
            ClientEvent::Ping => ServerEvent::Pong,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_wire_names() {
        // テスト項目: ゲームイベントは仕様どおりのタグ名で直列化される
        // given (前提条件):
        let event = ClientEvent::ScoreState {
            score_a: 5,
            score_b: 3,
        };

        // when (操作):
        let json = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "scoreState");
        assert_eq!(json["scoreA"], 5);
        assert_eq!(json["scoreB"], 3);
    }

    #[test]
    fn test_client_event_parse_ball_state() {
        // テスト項目: ballState イベントをデシリアライズできる
        // given (前提条件):
        let raw = r#"{"type":"ballState","x":10.0,"y":20.0,"vx":5.0,"vy":-3.0}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::BallState {
                x: 10.0,
                y: 20.0,
                vx: 5.0,
                vy: -3.0
            }
        );
    }

    #[test]
    fn test_client_event_unit_variants() {
        // テスト項目: ペイロードのないイベントはタグのみで表現される
        assert_eq!(
            serde_json::to_string(&ClientEvent::ResetMatch).unwrap(),
            r#"{"type":"resetMatch"}"#
        );
        let parsed: ClientEvent = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert_eq!(parsed, ClientEvent::Ping);
    }

    #[test]
    fn test_is_gameplay() {
        // テスト項目: ping 以外の5イベントがゲームプレイイベントと判定される
        assert!(ClientEvent::PaddleA { y: 0.0 }.is_gameplay());
        assert!(ClientEvent::ResetMatch.is_gameplay());
        assert!(!ClientEvent::Ping.is_gameplay());
    }

    #[test]
    fn test_relay_conversion_is_verbatim() {
        // テスト項目: 中継変換でペイロードが変化しない
        // given (前提条件):
        let event = ClientEvent::PaddleB { y: 123.5 };

        // when (操作):
        let relayed = ServerEvent::from(&event);

        // then (期待する結果):
        assert_eq!(relayed, ServerEvent::PaddleB { y: 123.5 });
        assert_eq!(
            serde_json::to_value(&relayed).unwrap(),
            serde_json::to_value(&event).unwrap()
        );
    }

    #[test]
    fn test_server_event_role_payload() {
        // テスト項目: ロール通知は役割名を camelCase で持つ
        // when (操作):
        let json = serde_json::to_value(ServerEvent::Role { role: Role::First }).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "role");
        assert_eq!(json["role"], "first");
    }
}

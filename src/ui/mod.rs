//! WebSocket relay server surface.

pub mod handler;
pub mod state; // UseCase 層からアクセスするため public に変更

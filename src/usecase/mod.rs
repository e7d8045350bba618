//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod admit_connection;
pub mod disconnect;
pub mod error;
pub mod relay_event;
pub mod room_lifecycle;

pub use admit_connection::{AdmitConnectionUseCase, Admission};
pub use disconnect::{Departure, DisconnectUseCase};
pub use error::AdmissionError;
pub use relay_event::RelayEventUseCase;
pub use room_lifecycle::RoomLifecycle;

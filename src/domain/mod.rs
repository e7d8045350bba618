//! Domain layer for the Pong relay.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{PlayerSession, Room};
pub use error::{RoomError, ValueObjectError};
pub use factory::{ConnectionIdFactory, RoomCodeFactory};
pub use repository::{ClaimOutcome, SessionStore, StoreError};
pub use value_object::{ConnectionId, Role, RoomCode, Timestamp};

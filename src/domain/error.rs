//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// RoomCode length validation error
    #[error("RoomCode must be exactly {expected} characters (got {actual})")]
    RoomCodeInvalidLength { expected: usize, actual: usize },

    /// RoomCode character validation error
    #[error("RoomCode may only contain A-Z and 0-9 (got '{0}')")]
    RoomCodeInvalidChar(char),

    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// ConnectionId too long error
    #[error("ConnectionId cannot exceed {max} characters (got {actual})")]
    ConnectionIdTooLong { max: usize, actual: usize },
}

/// Errors related to Room domain logic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// No room record exists for the requested code
    #[error("room not found")]
    RoomNotFound,

    /// A Second occupant already holds a live slot
    #[error("room is full")]
    RoomFull,
}

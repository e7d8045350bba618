//! UseCase layer error definitions.

use thiserror::Error;

use crate::domain::StoreError;

/// Reasons an admission is refused.
///
/// A refused connection is never scoped to a room and receives no
/// further events; the reason is surfaced to the connecting client.
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// No room record exists for the requested code
    #[error("room not found")]
    RoomNotFound,

    /// A Second occupant already holds a live slot
    #[error("room is full")]
    RoomFull,

    /// The session store could not be reached
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An unexpected internal failure
    #[error("internal error: {0}")]
    Internal(String),
}

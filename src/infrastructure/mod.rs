//! Infrastructure layer.
//!
//! Concrete implementations of the abstractions the domain layer
//! defines (session store backends) and the DTOs exchanged over the
//! wire and the diagnostic HTTP surface.

pub mod dto;
pub mod store;

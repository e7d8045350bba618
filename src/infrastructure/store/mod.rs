//! Session store backends.
//!
//! The usecase layer depends on the `SessionStore` trait (domain
//! layer) and never on these implementations directly (dependency
//! inversion). The Redis backend is the design target; the in-memory
//! backend is a degraded fallback for local development and tests.

pub mod memory;
pub mod redis;

pub use memory::InMemorySessionStore;
pub use redis::RedisSessionStore;

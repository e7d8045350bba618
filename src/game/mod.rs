//! Client-side authoritative synchronization protocol.
//!
//! Both participants render the full match, but only the First
//! participant's engine simulates ball physics and score increments;
//! every other field of the shared state is reconciled purely from
//! relayed broadcasts. See [`engine::MatchEngine`] for the
//! reconciliation rules.

pub mod engine;
pub mod state;

pub use engine::MatchEngine;
pub use state::{Ball, MatchPhase, SharedMatchState};

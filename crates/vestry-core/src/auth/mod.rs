//! Admin session gate.
//!
//! A deliberately low-security convenience gate: one shared password, one
//! flag in client-side storage. This is not an authentication system -
//! there is no hashing, no server-side session, and no rate limiting.

pub mod gate;

pub use gate::{SessionGate, DRAFT_KEYS};

//! Domain model for messages, placements and viewer settings.
//!
//! # Responsibility
//! - Define canonical data structures used by core logic.
//! - Keep derived fields (category, placement) reproducible from identity.
//!
//! # Invariants
//! - Every message is identified by a stable `MessageId`.
//! - Messages are immutable once created; there is no per-record delete.

pub mod message;
pub mod settings;
pub mod vec3;

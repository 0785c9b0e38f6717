//! Runtime scene state driven by a single per-frame update.
//!
//! # Responsibility
//! - Own live nodes, their animations and their render handles.
//! - Translate pointer input into picks against live nodes.
//! - Keep camera fly-to animations from overlapping.
//!
//! # Invariants
//! - Nothing here blocks; work per frame is linear in live objects.
//! - Animations are explicit state advanced by `update(dt)`, never
//!   self-scheduling callbacks.

pub mod animation;
pub mod backend;
pub mod camera;
pub mod nodes;

//! Deterministic placement of messages on the tree.
//!
//! # Responsibility
//! - Reduce `(author, id)` to a 32-bit seed.
//! - Map the seed to a tree part and a position inside that part's envelope.
//!
//! # Invariants
//! - `place` is pure: identical inputs yield bit-identical output.
//! - The tree part depends on `seed % 4` only, never on random draw order.

mod envelope;
mod hash;

pub use envelope::{
    category_for_seed, place, place_with_seed, BranchEnvelope, CanopyEnvelope, RootEnvelope,
    TrunkEnvelope, BRANCH, CANOPY, ROOT, TRUNK,
};
pub use hash::{placement_seed, seed_hash};

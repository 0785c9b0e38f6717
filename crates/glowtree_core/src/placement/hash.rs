//! Identity hashing for deterministic placement.
//!
//! # Invariants
//! - Output depends only on the UTF-16 code units of the input, so the
//!   browser client and this crate agree on every seed.
//! - Not cryptographic; collisions are tolerated.

/// Polynomial rolling hash (`hash * 31 + unit`) folded to 32 bits.
///
/// Arithmetic wraps as signed 32-bit; the absolute value is returned, so
/// `i32::MIN` maps to `2^31`.
pub fn seed_hash(value: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in value.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    hash.unsigned_abs()
}

/// Seed for a message identity: hash of `author` immediately followed by `id`.
pub fn placement_seed(author: &str, id: &str) -> u32 {
    let mut joined = String::with_capacity(author.len() + id.len());
    joined.push_str(author);
    joined.push_str(id);
    seed_hash(&joined)
}

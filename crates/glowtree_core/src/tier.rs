//! Milestone tiers derived from a message count.
//!
//! Stateless: callers recompute from the current store size (or a yearly
//! subset) whenever they need it.

use serde::Serialize;

/// One milestone level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tier {
    /// Minimum count (inclusive) that reaches this tier.
    pub threshold: u64,
    pub name: &'static str,
    /// CSS hex color.
    pub color: &'static str,
    pub icon: &'static str,
}

/// Ascending threshold table; the first entry starts at zero.
pub const TIERS: [Tier; 5] = [
    Tier {
        threshold: 0,
        name: "Red",
        color: "#e53935",
        icon: "🔴",
    },
    Tier {
        threshold: 100_000,
        name: "Silver",
        color: "#c0c0c0",
        icon: "🥈",
    },
    Tier {
        threshold: 1_000_000,
        name: "Gold",
        color: "#ffd700",
        icon: "🥇",
    },
    Tier {
        threshold: 10_000_000,
        name: "Platinum",
        color: "#e5e4e2",
        icon: "💎",
    },
    Tier {
        threshold: 100_000_000,
        name: "White",
        color: "#ffffff",
        icon: "⚪",
    },
];

/// Position of a count between the current and next tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierProgress {
    pub current: Tier,
    pub next: Option<Tier>,
    /// Fraction of the way to `next`, in `[0, 1]`; `1.0` at the final tier.
    pub fraction: f64,
    /// Count still needed to reach `next`; `0` at the final tier.
    pub remaining: u64,
}

/// Highest tier whose threshold is `<= count`.
pub fn calculate_tier(count: u64) -> Tier {
    TIERS[tier_index(count)]
}

pub fn progress(count: u64) -> TierProgress {
    let index = tier_index(count);
    let current = TIERS[index];
    match TIERS.get(index + 1) {
        Some(next) => {
            let span = next.threshold - current.threshold;
            let done = count - current.threshold;
            TierProgress {
                current,
                next: Some(*next),
                fraction: (done as f64 / span as f64).clamp(0.0, 1.0),
                remaining: next.threshold - count,
            }
        }
        None => TierProgress {
            current,
            next: None,
            fraction: 1.0,
            remaining: 0,
        },
    }
}

fn tier_index(count: u64) -> usize {
    TIERS
        .iter()
        .rposition(|tier| tier.threshold <= count)
        .unwrap_or(0)
}

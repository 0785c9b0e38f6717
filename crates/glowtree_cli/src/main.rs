//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `glowtree_core` linkage with deterministic output.
//! - Print the derived placement for `<author> <id>` and the tier for an
//!   optional count, so browser and core results can be compared by hand.

use glowtree_core::{calculate_tier, place, placement_seed, progress};

fn main() {
    println!("glowtree_core ping={}", glowtree_core::ping());
    println!("glowtree_core version={}", glowtree_core::core_version());

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let [author, id, rest @ ..] = args.as_slice() {
        let placement = place(author, id);
        println!("seed={}", placement_seed(author, id));
        println!("category={}", placement.category.as_str());
        println!(
            "position=({:.6}, {:.6}, {:.6})",
            placement.position.x, placement.position.y, placement.position.z
        );
        println!("intensity={:.6}", placement.intensity);

        if let Some(count) = rest.first().and_then(|value| value.parse::<u64>().ok()) {
            let tier = calculate_tier(count);
            let step = progress(count);
            println!(
                "tier={} color={} fraction={:.4} remaining={}",
                tier.name, tier.color, step.fraction, step.remaining
            );
        }
    }
}

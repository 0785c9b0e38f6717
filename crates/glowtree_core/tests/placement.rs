use glowtree_core::placement::{
    category_for_seed, place_with_seed, BRANCH, CANOPY, ROOT, TRUNK,
};
use glowtree_core::{place, placement_seed, TreePart};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::HashSet;

fn random_string(rng: &mut impl Rng, max_len: usize) -> String {
    let len = rng.gen_range(1..=max_len);
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[test]
fn place_is_deterministic_for_random_identities() {
    let mut rng = rand::thread_rng();
    for _ in 0..500 {
        let author = random_string(&mut rng, 24);
        let id = random_string(&mut rng, 36);

        let first = place(&author, &id);
        let second = place(&author, &id);
        assert_eq!(first, second, "author={author} id={id}");
        assert_eq!(first.position.x.to_bits(), second.position.x.to_bits());
        assert_eq!(first.position.y.to_bits(), second.position.y.to_bits());
        assert_eq!(first.position.z.to_bits(), second.position.z.to_bits());
    }
}

#[test]
fn every_category_appears_and_matches_seed_mod_four() {
    let mut rng = rand::thread_rng();
    let mut seen = HashSet::new();
    for _ in 0..2_000 {
        let author = random_string(&mut rng, 16);
        let id = random_string(&mut rng, 16);
        let seed = placement_seed(&author, &id);
        let placement = place(&author, &id);

        assert_eq!(placement.category, TreePart::ALL[(seed % 4) as usize]);
        seen.insert(placement.category);
    }
    assert_eq!(seen.len(), TreePart::ALL.len());
}

#[test]
fn known_seeds_map_to_expected_categories() {
    assert_eq!(placement_seed("Alice", "m1"), 750_164_932);
    assert_eq!(place("Alice", "m1").category, TreePart::Trunk);
    assert_eq!(placement_seed("Bob", "m2"), 64_356_794);
    assert_eq!(place("Bob", "m2").category, TreePart::Canopy);

    for seed in [0_u32, 1, 2, 3, 4, 97, 3105, u32::MAX, 1 << 31] {
        assert_eq!(category_for_seed(seed), TreePart::ALL[(seed % 4) as usize]);
    }
}

#[test]
fn positions_stay_inside_their_envelopes() {
    let eps = 1e-9;
    for seed in (0..40_000_u32).step_by(7) {
        let placement = place_with_seed(seed);
        let p = placement.position;
        let horizontal = (p.x * p.x + p.z * p.z).sqrt();

        assert!(placement.intensity >= 0.5 && placement.intensity <= 1.0);
        match placement.category {
            TreePart::Trunk => {
                assert!(horizontal >= TRUNK.radius.0 - eps && horizontal <= TRUNK.radius.1 + eps);
                assert!(p.y >= TRUNK.height.0 && p.y <= TRUNK.height.1);
            }
            TreePart::Branch => {
                let max_reach = BRANCH.reach * BRANCH.t.1 + BRANCH.half_width;
                assert!(horizontal <= max_reach + eps);
                assert!(p.y >= BRANCH.base_height - BRANCH.half_width - eps);
            }
            TreePart::Canopy => {
                let distance = p.distance(CANOPY.center);
                assert!(distance >= CANOPY.radius.0 - eps && distance <= CANOPY.radius.1 + eps);
            }
            TreePart::Root => {
                assert!(horizontal >= ROOT.radius.0 - eps && horizontal <= ROOT.radius.1 + eps);
                assert!(p.y >= ROOT.height.0 && p.y <= ROOT.height.1);
            }
        }
    }
}

#[test]
fn utf16_identities_hash_consistently() {
    let a = place("Zoë", "🎄-1");
    let b = place("Zoë", "🎄-1");
    assert_eq!(a, b);
    assert_ne!(placement_seed("Zoë", "🎄-1"), placement_seed("Zoe", "🎄-1"));
}

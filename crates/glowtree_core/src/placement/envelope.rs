//! Per-part placement envelopes.
//!
//! Each tree part owns a fixed region of space. The seed picks the angular
//! position; a ChaCha stream seeded from the same value supplies radius and
//! height jitter plus intensity, always drawn in the same order.

use crate::model::message::{Placement, TreePart};
use crate::model::vec3::Vec3;
use crate::placement::hash::placement_seed;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::TAU;

/// Cylinder hugging the trunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrunkEnvelope {
    pub radius: (f64, f64),
    pub height: (f64, f64),
}

/// Band following one of several branch curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchEnvelope {
    pub count: u32,
    /// Height where branches leave the trunk.
    pub base_height: f64,
    /// Horizontal reach at curve parameter `t = 1`.
    pub reach: f64,
    pub rise: f64,
    pub droop: f64,
    pub t: (f64, f64),
    pub half_width: f64,
}

/// Spherical shell around the crown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanopyEnvelope {
    pub center: Vec3,
    pub radius: (f64, f64),
    /// Polar angle from +y, in degrees.
    pub polar_degrees: (f64, f64),
}

/// Root band flaring out near the ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootEnvelope {
    pub radius: (f64, f64),
    pub height: (f64, f64),
    /// Azimuth twist per unit of radius, in radians.
    pub twist: f64,
}

pub const TRUNK: TrunkEnvelope = TrunkEnvelope {
    radius: (0.55, 0.70),
    height: (0.4, 2.8),
};

pub const BRANCH: BranchEnvelope = BranchEnvelope {
    count: 5,
    base_height: 2.6,
    reach: 2.4,
    rise: 1.4,
    droop: 0.5,
    t: (0.25, 0.95),
    half_width: 0.15,
};

pub const CANOPY: CanopyEnvelope = CanopyEnvelope {
    center: Vec3::new(0.0, 4.2, 0.0),
    radius: (2.1, 2.7),
    polar_degrees: (15.0, 100.0),
};

pub const ROOT: RootEnvelope = RootEnvelope {
    radius: (0.9, 2.2),
    height: (-0.35, 0.05),
    twist: 0.35,
};

const INTENSITY_MIN: f64 = 0.5;
const INTENSITY_MAX: f64 = 1.0;

/// Tree part for a seed: `TreePart::ALL[seed % 4]`.
pub fn category_for_seed(seed: u32) -> TreePart {
    TreePart::ALL[(seed % TreePart::ALL.len() as u32) as usize]
}

/// Derives the placement for a message identity.
pub fn place(author: &str, id: &str) -> Placement {
    place_with_seed(placement_seed(author, id))
}

/// Derives a placement from an already computed seed.
pub fn place_with_seed(seed: u32) -> Placement {
    let category = category_for_seed(seed);
    let azimuth = seed_azimuth(seed);
    let mut rng = ChaCha8Rng::seed_from_u64(u64::from(seed));

    let position = match category {
        TreePart::Trunk => trunk_position(azimuth, &mut rng),
        TreePart::Branch => branch_position(seed, azimuth, &mut rng),
        TreePart::Canopy => canopy_position(azimuth, &mut rng),
        TreePart::Root => root_position(azimuth, &mut rng),
    };
    let intensity = lerp((INTENSITY_MIN, INTENSITY_MAX), rng.gen::<f64>());

    Placement {
        category,
        position,
        intensity,
    }
}

/// Whole-degree azimuth taken from the seed bits above the category.
fn seed_azimuth(seed: u32) -> f64 {
    f64::from((seed / 4) % 360).to_radians()
}

fn trunk_position(azimuth: f64, rng: &mut ChaCha8Rng) -> Vec3 {
    let radius = lerp(TRUNK.radius, rng.gen());
    let height = lerp(TRUNK.height, rng.gen());
    Vec3::new(radius * azimuth.cos(), height, radius * azimuth.sin())
}

fn branch_position(seed: u32, azimuth: f64, rng: &mut ChaCha8Rng) -> Vec3 {
    let branch = (seed / (4 * 360)) % BRANCH.count;
    let heading = TAU * f64::from(branch) / f64::from(BRANCH.count) + TAU / 20.0;
    let t = lerp(BRANCH.t, rng.gen());
    let offset = BRANCH.half_width * rng.gen::<f64>();

    let along = Vec3::new(heading.cos(), 0.0, heading.sin());
    let spine = along * (BRANCH.reach * t)
        + Vec3::new(
            0.0,
            BRANCH.base_height + BRANCH.rise * t - BRANCH.droop * t * t,
            0.0,
        );
    // Offset around the spine in the plane spanned by up and the sideways axis.
    let side = Vec3::new(-heading.sin(), 0.0, heading.cos());
    spine + (Vec3::UP * azimuth.cos() + side * azimuth.sin()) * offset
}

fn canopy_position(azimuth: f64, rng: &mut ChaCha8Rng) -> Vec3 {
    let radius = lerp(CANOPY.radius, rng.gen());
    let polar = lerp(CANOPY.polar_degrees, rng.gen()).to_radians();
    CANOPY.center
        + Vec3::new(
            radius * polar.sin() * azimuth.cos(),
            radius * polar.cos(),
            radius * polar.sin() * azimuth.sin(),
        )
}

fn root_position(azimuth: f64, rng: &mut ChaCha8Rng) -> Vec3 {
    let radius = lerp(ROOT.radius, rng.gen());
    let height = lerp(ROOT.height, rng.gen());
    let angle = azimuth + (radius - ROOT.radius.0) * ROOT.twist;
    Vec3::new(radius * angle.cos(), height, radius * angle.sin())
}

fn lerp(bounds: (f64, f64), u: f64) -> f64 {
    bounds.0 + (bounds.1 - bounds.0) * u
}

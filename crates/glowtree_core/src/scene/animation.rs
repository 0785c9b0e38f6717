//! Easing curves and per-frame animation math.
//!
//! Everything here is a pure function of elapsed time; the node manager owns
//! the clocks and advances them from its single `update(dt)` call.

use crate::model::vec3::Vec3;

pub const BIRTH_DURATION: f64 = 1.2;
pub const BIRTH_START_SCALE: f64 = 0.01;
pub const BIRTH_PEAK_SCALE: f64 = 1.1;
/// Fraction of the birth duration at which the overshoot peaks.
pub const BIRTH_PEAK_AT: f64 = 0.7;

pub const PULSE_DURATION: f64 = 1.0;
pub const PULSE_START_RADIUS: f64 = 0.2;
pub const PULSE_END_RADIUS: f64 = 1.6;

/// Radians per second of the idle spin.
pub const SPIN_SPEED: f64 = 0.3;

pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv * inv / 2.0
    }
}

/// Birth scale at normalized progress `t`.
///
/// Rises from `BIRTH_START_SCALE` to `BIRTH_PEAK_SCALE` at `BIRTH_PEAK_AT`,
/// then settles to exactly `1.0` at `t = 1`.
pub fn birth_scale(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t >= 1.0 {
        return 1.0;
    }
    if t <= BIRTH_PEAK_AT {
        let rise = ease_out_cubic(t / BIRTH_PEAK_AT);
        BIRTH_START_SCALE + (BIRTH_PEAK_SCALE - BIRTH_START_SCALE) * rise
    } else {
        let settle = ease_in_out_cubic((t - BIRTH_PEAK_AT) / (1.0 - BIRTH_PEAK_AT));
        BIRTH_PEAK_SCALE - (BIRTH_PEAK_SCALE - 1.0) * settle
    }
}

/// Idle sway around a node's original position.
///
/// Two sine terms per axis with distinct frequencies; `phase` desynchronizes
/// nodes from each other. Magnitude stays below 0.03 per axis.
pub fn sway_offset(time: f64, phase: f64) -> Vec3 {
    Vec3::new(
        (time * 0.9 + phase).sin() * 0.02 + (time * 2.1 + phase * 1.7).sin() * 0.01,
        (time * 0.7 + phase * 1.3).sin() * 0.02 + (time * 1.9 + phase * 0.6).sin() * 0.01,
        (time * 1.1 + phase * 0.8).sin() * 0.02 + (time * 2.3 + phase * 1.1).sin() * 0.01,
    )
}

/// Highlight ring radius and opacity at normalized progress `t`.
pub fn pulse_frame(t: f64) -> (f64, f64) {
    let eased = ease_out_cubic(t);
    let radius = PULSE_START_RADIUS + (PULSE_END_RADIUS - PULSE_START_RADIUS) * eased;
    (radius, 1.0 - t.clamp(0.0, 1.0))
}

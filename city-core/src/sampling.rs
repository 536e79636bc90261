//! Random headings and the candidate radius ladder.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;
use rand::Rng;

use crate::config::DirectionStrategy;

const CARDINALS: [f32; 4] = [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2];

/// Draws a heading in radians according to `strategy`.
///
/// Uniform headings consume one draw. Cardinal headings consume one draw for
/// the axis and two for the Box-Muller jitter.
pub fn sample_angle<R: Rng>(strategy: DirectionStrategy, rng: &mut R) -> f32 {
    match strategy {
        DirectionStrategy::Uniform => rng.random_range(0.0..TAU),
        DirectionStrategy::CardinalBiased { jitter } => {
            let base = CARDINALS[rng.random_range(0..CARDINALS.len())];
            base + standard_normal(rng) * jitter
        }
    }
}

/// Standard normal sample via the Box-Muller transform.
pub fn standard_normal<R: Rng>(rng: &mut R) -> f32 {
    let u1: f32 = rng.random();
    let u2: f32 = rng.random();
    // ln(0) is -inf
    let u1 = if u1 == 0.0 { f32::MIN_POSITIVE } else { u1 };
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

/// `samples` radii evenly spaced over `[min_distance, 2 * min_distance]`,
/// both ends included, in increasing order.
pub fn radius_ladder(min_distance: f32, samples: usize) -> impl Iterator<Item = f32> {
    let step = if samples > 1 {
        min_distance / (samples - 1) as f32
    } else {
        0.0
    };
    (0..samples).map(move |i| min_distance + step * i as f32)
}

/// Rounds each coordinate to the nearest multiple of `pitch`.
#[inline]
pub fn snap_to_grid(pos: Vec2, pitch: f32) -> Vec2 {
    (pos / pitch).round() * pitch
}

//! Growth configuration and the named presets.

use std::f32::consts::PI;
use std::ops::RangeInclusive;

use crate::error::{ConfigError, Result};

/// How a growth attempt picks its heading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DirectionStrategy {
    /// Angle drawn uniformly over `[0, 2π)`. Produces organic sprawl.
    Uniform,
    /// One of the four cardinal headings, plus Gaussian noise with standard
    /// deviation `jitter` (radians). Produces grid-like networks.
    CardinalBiased { jitter: f32 },
}

impl DirectionStrategy {
    pub const DEFAULT_JITTER: f32 = PI / 16.0;

    pub fn cardinal() -> Self {
        Self::CardinalBiased {
            jitter: Self::DEFAULT_JITTER,
        }
    }
}

/// When the spatial index is rebuilt after insertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RebuildPolicy {
    /// Rebuild on the first query after any insertion.
    Lazy,
    /// Rebuild once this many insertions are pending. Pending positions are
    /// still scanned on every query.
    Every(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Base spacing; the candidate radius ladder spans `[min, 2 * min]`.
    pub min_distance: f32,
    /// Minimum separation for a brand-new node to be accepted.
    pub reject_distance: f32,
    /// Below this, a candidate is treated as the existing nearest node.
    pub merge_distance: f32,
    pub direction: DirectionStrategy,
    /// Inclusive range the per-step attempt count is drawn from.
    pub attempts_per_step: RangeInclusive<u32>,
    /// Number of evenly spaced radii tried per attempt.
    pub radius_samples: usize,
    /// Snap candidates to a square grid of this pitch.
    pub snap_grid: Option<f32>,
    pub rebuild: RebuildPolicy,
    /// Fixed seed for reproducible runs; `None` seeds from the OS.
    pub random_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self::enhanced()
    }
}

impl Config {
    pub const DEFAULT_MIN_DISTANCE: f32 = 0.03;

    /// Uniform headings, fine radius ladder, index rebuilt every 10th node.
    pub fn organic() -> Self {
        Self {
            rebuild: RebuildPolicy::Every(10),
            ..Self::enhanced()
        }
    }

    /// Uniform headings, fine radius ladder, lazily rebuilt index.
    pub fn enhanced() -> Self {
        let min_distance = Self::DEFAULT_MIN_DISTANCE;
        Self {
            min_distance,
            reject_distance: min_distance,
            merge_distance: min_distance * 0.5,
            direction: DirectionStrategy::Uniform,
            attempts_per_step: 1..=3,
            radius_samples: 5,
            snap_grid: None,
            rebuild: RebuildPolicy::Lazy,
            random_seed: None,
        }
    }

    /// Cardinal headings snapped to a grid, coarse radius ladder and a
    /// slightly looser spacing rule.
    pub fn suburban() -> Self {
        let min_distance = Self::DEFAULT_MIN_DISTANCE;
        Self {
            min_distance,
            reject_distance: min_distance * 0.9,
            merge_distance: min_distance * 0.5,
            direction: DirectionStrategy::cardinal(),
            attempts_per_step: 1..=3,
            radius_samples: 3,
            snap_grid: Some(min_distance),
            rebuild: RebuildPolicy::Lazy,
            random_seed: None,
        }
    }

    /// Rescales every distance of the config to a new `min_distance`,
    /// keeping the ratios of the thresholds and the grid pitch.
    pub fn with_min_distance(mut self, min_distance: f32) -> Self {
        let scale = min_distance / self.min_distance;
        self.min_distance = min_distance;
        self.reject_distance *= scale;
        self.merge_distance *= scale;
        self.snap_grid = self.snap_grid.map(|g| g * scale);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Checks every invariant the engine relies on.
    pub fn validate(&self) -> Result<()> {
        // The far end of the radius ladder must stay finite too.
        if !is_finite_positive(self.min_distance) || !(2.0 * self.min_distance).is_finite() {
            return Err(ConfigError::NonPositiveMinDistance(self.min_distance));
        }
        for (name, value) in [
            ("reject_distance", self.reject_distance),
            ("merge_distance", self.merge_distance),
        ] {
            if !is_finite_positive(value) {
                return Err(ConfigError::NonPositiveThreshold { name, value });
            }
        }
        if self.merge_distance >= self.reject_distance {
            return Err(ConfigError::MergeNotBelowReject {
                merge: self.merge_distance,
                reject: self.reject_distance,
            });
        }

        let (start, end) = (*self.attempts_per_step.start(), *self.attempts_per_step.end());
        if start == 0 || start > end {
            return Err(ConfigError::EmptyAttemptRange { start, end });
        }

        if self.radius_samples == 0 {
            return Err(ConfigError::TooFewRadiusSamples(self.radius_samples));
        }
        if let Some(pitch) = self.snap_grid
            && !is_finite_positive(pitch)
        {
            return Err(ConfigError::NonPositiveGrid(pitch));
        }
        if self.rebuild == RebuildPolicy::Every(0) {
            return Err(ConfigError::ZeroRebuildCadence);
        }
        if let DirectionStrategy::CardinalBiased { jitter } = self.direction
            && !(jitter.is_finite() && jitter >= 0.0)
        {
            return Err(ConfigError::NegativeJitter(jitter));
        }
        Ok(())
    }

    /// Largest number of attempts a single step can make.
    #[inline]
    pub fn max_attempts(&self) -> u32 {
        *self.attempts_per_step.end()
    }
}

#[inline]
fn is_finite_positive(x: f32) -> bool {
    x.is_finite() && x > 0.0
}

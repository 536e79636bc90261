//! Configuration errors.
//!
//! Construction is the only fallible operation of the engine; everything
//! that can go wrong during growth is an expected branch of the policy.

/// Result type alias using [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Reasons a [`crate::config::Config`] is rejected at construction time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("min_distance must be finite and positive, got {0}")]
    NonPositiveMinDistance(f32),

    #[error("{name} must be finite and positive, got {value}")]
    NonPositiveThreshold { name: &'static str, value: f32 },

    #[error("merge_distance ({merge}) must be below reject_distance ({reject})")]
    MergeNotBelowReject { merge: f32, reject: f32 },

    #[error("attempts_per_step must be a non-empty range starting at 1, got {start}..={end}")]
    EmptyAttemptRange { start: u32, end: u32 },

    #[error("radius_samples must be at least 1, got {0}")]
    TooFewRadiusSamples(usize),

    #[error("snap_grid pitch must be finite and positive, got {0}")]
    NonPositiveGrid(f32),

    #[error("rebuild cadence must be at least 1")]
    ZeroRebuildCadence,

    #[error("direction jitter must be finite and non-negative, got {0}")]
    NegativeJitter(f32),
}

//! Procedural road network growth.
//!
//! Main components:
//! - [`engine`] — the growth engine that drives one frontier node per step.
//! - [`network`] — nodes, roads and the spacing rule.
//! - [`spatial`] — R-tree nearest-neighbour index over node positions.
//! - [`frontier`] — FIFO of nodes waiting to grow.
//! - [`sampling`] — heading strategies and the candidate radius ladder.
//! - [`config`] — growth parameters and presets.
//! - [`clock`] — simulation time.
//! - [`error`] — configuration errors.
//! - [`types`] — shared type aliases and IDs.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod frontier;
pub mod network;
pub mod sampling;
pub mod spatial;
pub mod types;

pub use config::{Config, DirectionStrategy, RebuildPolicy};
pub use engine::{GrowthEngine, NetworkStats, StepOutcome, StepReport};
pub use error::ConfigError;

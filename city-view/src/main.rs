//! Application entry point for the road network viewer.
//!
//! This binary parses the command line, sets up logging and eframe/egui,
//! and delegates all interactive logic and rendering to [`Viewer`] from
//! the `viewer` module.

mod viewer;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use viewer::{Preset, Viewer};

/// Grows an endless road network and renders it live.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Growth flavour to start from.
    #[arg(long, value_enum, default_value_t = Preset::Enhanced)]
    preset: Preset,

    /// Seed for a reproducible network.
    #[arg(long)]
    seed: Option<u64>,

    /// Base node spacing; the preset's thresholds are rescaled to it.
    #[arg(long)]
    min_distance: Option<f32>,

    /// Growth steps per rendered batch.
    #[arg(long, default_value_t = 15)]
    steps_per_frame: usize,
}

/// Starts the native eframe application.
///
/// Logging honours `RUST_LOG`; the default shows `info` and above.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,city_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut cfg = cli.preset.config();
    if let Some(min_distance) = cli.min_distance {
        cfg = cfg.with_min_distance(min_distance);
    }
    cfg.random_seed = cli.seed;

    let viewer = match Viewer::new(cli.preset, cfg, cli.steps_per_frame.max(1)) {
        Ok(viewer) => viewer,
        Err(err) => {
            error!(%err, "invalid configuration");
            std::process::exit(2);
        }
    };

    eframe::run_native(
        "Infinite City",
        eframe::NativeOptions::default(),
        Box::new(|_cc| Ok(Box::new(viewer))),
    )
}

//! Interactive road network viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`GrowthEngine`] and
//! implements [`eframe::App`] to drive, render and reconfigure the growth
//! through an egui UI.

use city_core::{
    Config, ConfigError, DirectionStrategy, GrowthEngine, RebuildPolicy, StepOutcome,
    types::{NodeId, Tick},
};
use eframe::App;
use glam::Vec2;
use tracing::{info, warn};

/// Road age (in steps) at which the colour ramp saturates.
const AGE_SATURATION: f32 = 50.0;

/// Colour stops of the age ramp: fresh roads are green, old ones red.
const AGE_RAMP: [[u8; 3]; 4] = [
    [0, 128, 0],   // green
    [255, 255, 0], // yellow
    [255, 165, 0], // orange
    [255, 0, 0],   // red
];

/// The three growth flavours selectable from the command line and the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// Uniform headings, index rebuilt every 10th node.
    Organic,
    /// Uniform headings, lazily rebuilt index.
    Enhanced,
    /// Grid-snapped cardinal headings.
    Suburban,
}

impl Preset {
    pub fn config(self) -> Config {
        match self {
            Preset::Organic => Config::organic(),
            Preset::Enhanced => Config::enhanced(),
            Preset::Suburban => Config::suburban(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Preset::Organic => "organic",
            Preset::Enhanced => "enhanced",
            Preset::Suburban => "suburban",
        }
    }
}

/// Maps a normalized age in `[0, 1]` onto the green → red ramp.
pub fn age_color(t: f32, alpha: f32) -> egui::Color32 {
    let t = t.clamp(0.0, 1.0) * (AGE_RAMP.len() - 1) as f32;
    let i = (t.floor() as usize).min(AGE_RAMP.len() - 2);
    let f = t - i as f32;
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * f).round() as u8;
    let (lo, hi) = (AGE_RAMP[i], AGE_RAMP[i + 1]);
    egui::Color32::from_rgba_unmultiplied(
        lerp(lo[0], hi[0]),
        lerp(lo[1], hi[1]),
        lerp(lo[2], hi[2]),
        (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

/// Normalized age of a road created at `created_at`, seen at `now`.
#[inline]
pub fn normalized_age(created_at: Tick, now: Tick) -> f32 {
    (now.saturating_sub(created_at) as f32 / AGE_SATURATION).min(1.0)
}

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: [`GrowthEngine`] and the [`Config`] it was built from.
/// - UI configuration (pan/zoom, batch size, timing).
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running` is `true` and enough time has passed, call [`Viewer::step_once`].
/// 3. Render the roads, fresh nodes and the statistics overlay.
pub struct Viewer {
    engine: GrowthEngine,
    /// Editable copy of the configuration; applied on reset.
    cfg: Config,
    preset: Preset,
    last_error: Option<String>,

    running: bool,
    /// Pixels per world unit.
    zoom: f32,
    pan: egui::Vec2,
    auto_fit: bool,

    steps_per_frame: usize,
    last_new_ids: Vec<NodeId>,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Creates a viewer around a fresh engine built from `cfg`.
    ///
    /// ### Parameters
    /// - `preset` - Preset shown as selected in the config panel.
    /// - `cfg` - Growth configuration, usually `preset.config()` plus CLI overrides.
    /// - `steps_per_frame` - Number of growth steps per rendered batch.
    ///
    /// ### Returns
    /// The viewer, or the configuration error reported by the engine.
    pub fn new(
        preset: Preset,
        cfg: Config,
        steps_per_frame: usize,
    ) -> Result<Self, ConfigError> {
        let engine = GrowthEngine::new(cfg.clone())?;
        info!(
            preset = preset.label(),
            seed = ?cfg.random_seed,
            "starting road network growth"
        );

        Ok(Self {
            engine,
            cfg,
            preset,
            last_error: None,
            running: false,
            zoom: 400.0,
            pan: egui::vec2(0.0, 0.0),
            auto_fit: true,
            steps_per_frame,
            last_new_ids: Vec::with_capacity(64),
            step_interval: 0.03,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        })
    }

    /// Rebuilds the engine from the edited configuration.
    ///
    /// On an invalid configuration the current network is kept and the error
    /// is shown in the config panel.
    fn reset(&mut self) {
        match GrowthEngine::new(self.cfg.clone()) {
            Ok(engine) => {
                self.engine = engine;
                self.last_error = None;
                self.last_new_ids.clear();
                self.running = false;
            }
            Err(err) => {
                warn!(%err, "rejected configuration");
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Advances the simulation by one batch of `steps_per_frame` steps.
    ///
    /// The ids of nodes created in this batch are stored in `last_new_ids`
    /// so they can be highlighted in the next frame.
    fn step_once(&mut self) {
        self.last_new_ids.clear();
        for _ in 0..self.steps_per_frame {
            if let StepOutcome::Grew(report) = self.engine.step() {
                self.last_new_ids.extend(report.created);
            }
        }
    }

    /// Converts a world-space position to screen-space.
    ///
    /// World coordinates are scaled by `zoom`, offset by `pan`, and then
    /// centered inside the given `rect`. The y-axis is flipped so that
    /// positive y goes up in world space.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + p.x * self.zoom + self.pan.x,
            center.y - p.y * self.zoom + self.pan.y,
        )
    }

    /// Converts a screen-space position back to world-space.
    ///
    /// This is the inverse of [`Viewer::world_to_screen`] (up to floating
    /// point rounding).
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        Vec2::new(x, y)
    }

    /// Sets zoom and pan so the whole network, plus a 0.1 margin, fills `rect`.
    fn fit_view(&mut self, rect: egui::Rect) {
        let Some((lo, hi)) = self.engine.graph().bounds() else {
            return;
        };
        let lo = lo - Vec2::splat(0.1);
        let hi = hi + Vec2::splat(0.1);
        let extent = hi - lo;
        self.zoom = (rect.width() / extent.x).min(rect.height() / extent.y);

        let mid = (lo + hi) * 0.5;
        self.pan = egui::vec2(-mid.x * self.zoom, mid.y * self.zoom);
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.0..=1.0)
                        .speed(0.01),
                );
                ui.add(
                    egui::DragValue::new(&mut self.steps_per_frame)
                        .prefix("steps/frame = ")
                        .range(1..=500)
                        .speed(1.0),
                );

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                ui.checkbox(&mut self.auto_fit, "Auto-fit");
                ui.add_enabled(
                    !self.auto_fit,
                    egui::Slider::new(&mut self.zoom, 10.0..=5000.0)
                        .logarithmic(true)
                        .text("Zoom"),
                );
            });
        });
    }

    /// Builds the bottom status bar (timing, clock, frontier size).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        let stats = self.engine.stats();
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("time = {}", stats.time));
                ui.label(format!("frontier = {}", stats.frontier));
            });
        });
    }

    /// Builds the right-hand configuration panel for growth parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                let mut preset = self.preset;
                egui::ComboBox::from_label("preset")
                    .selected_text(preset.label())
                    .show_ui(ui, |ui| {
                        for p in [Preset::Organic, Preset::Enhanced, Preset::Suburban] {
                            ui.selectable_value(&mut preset, p, p.label());
                        }
                    });
                if preset != self.preset {
                    let seed = self.cfg.random_seed;
                    self.preset = preset;
                    self.cfg = preset.config();
                    self.cfg.random_seed = seed;
                }

                ui.separator();
                ui.label("Spacing");
                Self::labeled_drag_f32(
                    ui,
                    "min_distance:",
                    &mut self.cfg.min_distance,
                    0.001..=1.0,
                    0.001,
                );
                Self::labeled_drag_f32(
                    ui,
                    "reject_distance:",
                    &mut self.cfg.reject_distance,
                    0.001..=1.0,
                    0.001,
                );
                Self::labeled_drag_f32(
                    ui,
                    "merge_distance:",
                    &mut self.cfg.merge_distance,
                    0.001..=1.0,
                    0.001,
                );

                ui.separator();
                ui.label("Candidates");
                Self::labeled_drag_usize(
                    ui,
                    "radius_samples:",
                    &mut self.cfg.radius_samples,
                    1..=16,
                    1.0,
                );
                let mut max_attempts = self.cfg.max_attempts();
                ui.horizontal(|ui| {
                    ui.label("max attempts:");
                    ui.add(egui::DragValue::new(&mut max_attempts).range(1..=8));
                });
                self.cfg.attempts_per_step = 1..=max_attempts;

                let mut snap = self.cfg.snap_grid.is_some();
                ui.checkbox(&mut snap, "snap to grid");
                let pitch = self.cfg.snap_grid.unwrap_or(self.cfg.min_distance);
                self.cfg.snap_grid = snap.then_some(pitch);

                ui.separator();
                ui.label("Headings");
                let mut cardinal =
                    matches!(self.cfg.direction, DirectionStrategy::CardinalBiased { .. });
                ui.radio_value(&mut cardinal, false, "uniform");
                ui.radio_value(&mut cardinal, true, "cardinal");
                self.cfg.direction = match (cardinal, self.cfg.direction) {
                    (false, _) => DirectionStrategy::Uniform,
                    (true, DirectionStrategy::CardinalBiased { jitter }) => {
                        let mut jitter = jitter;
                        Self::labeled_drag_f32(ui, "jitter (rad):", &mut jitter, 0.0..=1.0, 0.005);
                        DirectionStrategy::CardinalBiased { jitter }
                    }
                    (true, DirectionStrategy::Uniform) => DirectionStrategy::cardinal(),
                };

                ui.separator();
                ui.label("Spatial index");
                let mut lazy = self.cfg.rebuild == RebuildPolicy::Lazy;
                ui.checkbox(&mut lazy, "lazy rebuild");
                if lazy {
                    self.cfg.rebuild = RebuildPolicy::Lazy;
                } else {
                    let mut every = match self.cfg.rebuild {
                        RebuildPolicy::Every(k) => k,
                        RebuildPolicy::Lazy => 10,
                    };
                    Self::labeled_drag_usize(ui, "rebuild every:", &mut every, 1..=1000, 1.0);
                    self.cfg.rebuild = RebuildPolicy::Every(every);
                }

                ui.separator();
                let mut seeded = self.cfg.random_seed.is_some();
                let mut seed = self.cfg.random_seed.unwrap_or(0);
                ui.horizontal(|ui| {
                    ui.checkbox(&mut seeded, "seed:");
                    ui.add_enabled(seeded, egui::DragValue::new(&mut seed));
                });
                self.cfg.random_seed = seeded.then_some(seed);

                ui.separator();
                if ui.button("Apply (reset)").clicked() {
                    self.reset();
                }
                if ui.button("Reset cfg to preset").clicked() {
                    self.cfg = self.preset.config();
                }
                if let Some(err) = &self.last_error {
                    ui.colored_label(egui::Color32::LIGHT_RED, err.as_str());
                }
            });
    }

    /// Builds the floating statistics overlay.
    fn ui_stats_overlay(&self, ctx: &egui::Context) {
        let stats = self.engine.stats();
        egui::Area::new("stats".into())
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 40.0))
            .movable(false)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(0, 0, 0, 128))
                    .inner_margin(6.0)
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Roads: {}\nNodes: {}",
                                stats.roads, stats.nodes
                            ))
                            .color(egui::Color32::WHITE)
                            .monospace(),
                        );
                    });
            });
    }

    /// Builds the central panel where the network is drawn and navigated.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::from_rgb(3, 5, 5)))
            .show(ctx, |ui| {
                let response =
                    ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                // Manual navigation turns auto-fit off.
                if response.dragged() {
                    self.auto_fit = false;
                    self.pan += response.drag_delta();
                }

                // Zoom around the mouse cursor.
                let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 && response.hovered() {
                    self.auto_fit = false;
                    let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                    let world_before = self.screen_to_world(pointer_screen, rect);

                    let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                    self.zoom = (self.zoom * factor).clamp(10.0, 5000.0);

                    let screen_after = self.world_to_screen(world_before, rect);
                    self.pan += pointer_screen - screen_after;
                }

                if self.auto_fit {
                    self.fit_view(rect);
                }

                let now = self.engine.current_time();
                let graph = self.engine.graph();

                // Glow pass under the main pass.
                for (width, alpha) in [(4.0, 0.2), (1.5, 0.9)] {
                    for road in graph.roads() {
                        let (Some(pa), Some(pb)) =
                            (graph.position_of(road.a()), graph.position_of(road.b()))
                        else {
                            continue;
                        };
                        let color = age_color(normalized_age(road.created_at, now), alpha);
                        painter.line_segment(
                            [self.world_to_screen(pa, rect), self.world_to_screen(pb, rect)],
                            egui::Stroke::new(width, color),
                        );
                    }
                }

                // Highlight nodes from the latest batch.
                for &id in &self.last_new_ids {
                    if let Some(p) = graph.position_of(id) {
                        painter.circle_filled(
                            self.world_to_screen(p, rect),
                            2.0,
                            egui::Color32::LIGHT_BLUE,
                        );
                    }
                }

                // Auto-run simulation if requested.
                if self.running {
                    let now = ctx.input(|i| i.time);
                    let elapsed = now - self.last_step_time;
                    if elapsed >= self.step_interval {
                        if self.last_step_time > 0.0 {
                            self.last_step_dt = elapsed;
                        }
                        self.step_once();
                        self.last_step_time = now;
                    }

                    ctx.request_repaint();
                }
            });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
        self.ui_stats_overlay(ctx);
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        let stats = self.engine.stats();
        info!(
            roads = stats.roads,
            nodes = stats.nodes,
            time = stats.time,
            "simulation ended"
        );
    }
}

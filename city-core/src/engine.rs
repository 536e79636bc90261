//! The growth engine: one frontier node per step, a few roads per node.
//!
//! A typical driver loop looks like:
//! 1. Call [`GrowthEngine::step`] a batch of times (or [`GrowthEngine::run`]).
//! 2. Read [`GrowthEngine::graph`] and [`GrowthEngine::current_time`] to
//!    draw the network, colouring roads by [`crate::network::Road::age`].
//! 3. Repeat.

use glam::Vec2;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, trace};

use crate::{
    clock::SimulationClock,
    config::Config,
    error::Result,
    frontier::GrowthFrontier,
    network::{NetworkGraph, Road},
    sampling,
    types::{NodeId, Tick},
};

/// What a single growth attempt ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Attempt {
    Created(NodeId),
    Merged,
    Abandoned,
}

/// Summary of a step that expanded a frontier node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// The node that was expanded.
    pub origin: NodeId,
    /// Number of growth attempts drawn for this step.
    pub attempts: u32,
    /// Nodes created this step, in creation order.
    pub created: Vec<NodeId>,
    /// Attempts that resolved to an existing node.
    pub merged: usize,
    /// Attempts that found no usable position.
    pub abandoned: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The graph is empty; nothing to do.
    Idle,
    /// The frontier was exhausted and has been reseeded with this node.
    Reseeded(NodeId),
    /// A frontier node was expanded.
    Grew(StepReport),
}

/// Counts for a statistics overlay or an end-of-run summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkStats {
    pub nodes: usize,
    pub roads: usize,
    pub time: Tick,
    pub frontier: usize,
}

/// Owns the road network, the growth frontier, the clock and the random
/// source, and advances them together one step at a time.
#[derive(Debug)]
pub struct GrowthEngine {
    cfg: Config,
    graph: NetworkGraph,
    frontier: GrowthFrontier,
    clock: SimulationClock,
    rng: StdRng,
}

impl GrowthEngine {
    /// Creates an engine holding a single node at the origin.
    ///
    /// The configuration is validated first; this is the only place the
    /// engine can fail.
    ///
    /// ### Parameters
    /// - `cfg` - Growth parameters. `random_seed` makes the run reproducible.
    ///
    /// ### Returns
    /// The engine, or the [`crate::error::ConfigError`] describing the
    /// first violated constraint.
    pub fn new(cfg: Config) -> Result<Self> {
        cfg.validate()?;

        let rng = match cfg.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut graph = NetworkGraph::new(cfg.reject_distance, cfg.rebuild);
        let mut frontier = GrowthFrontier::new();
        if let Some(root) = graph.add_node(Vec2::ZERO) {
            frontier.push(root);
        }

        debug!(?cfg, "growth engine created");
        Ok(Self {
            cfg,
            graph,
            frontier,
            clock: SimulationClock::new(),
            rng,
        })
    }

    /// Advances the simulation by one step.
    ///
    /// 1. If the frontier is empty, reseed it with a uniformly random
    ///    existing node and stop. The clock does not move.
    /// 2. Otherwise tick the clock and pop the next frontier node.
    /// 3. Draw an attempt count from [`Config::attempts_per_step`] and run
    ///    that many growth attempts from the popped node. Each attempt sees
    ///    the nodes created by the attempts before it.
    ///
    /// Attempts that find no room are dropped silently.
    ///
    /// ### Returns
    /// A [`StepOutcome`] describing what happened.
    pub fn step(&mut self) -> StepOutcome {
        if self.frontier.is_empty() {
            let n = self.graph.node_count();
            let rng = &mut self.rng;
            return match self.frontier.recover(|| (n > 0).then(|| rng.random_range(0..n))) {
                Some(id) => {
                    debug!(node = id, "frontier exhausted, reseeded");
                    StepOutcome::Reseeded(id)
                }
                None => StepOutcome::Idle,
            };
        }

        let Some(origin) = self.frontier.pop() else {
            return StepOutcome::Idle;
        };
        let now = self.clock.tick();
        let Some(origin_pos) = self.graph.position_of(origin) else {
            return StepOutcome::Idle;
        };

        let attempts = self.rng.random_range(self.cfg.attempts_per_step.clone());
        let mut report = StepReport {
            origin,
            attempts,
            ..StepReport::default()
        };

        for _ in 0..attempts {
            match self.attempt(origin, origin_pos, now) {
                Attempt::Created(id) => report.created.push(id),
                Attempt::Merged => report.merged += 1,
                Attempt::Abandoned => report.abandoned += 1,
            }
        }

        trace!(
            time = now,
            origin,
            created = report.created.len(),
            merged = report.merged,
            abandoned = report.abandoned,
            "step"
        );
        StepOutcome::Grew(report)
    }

    /// Runs `steps` consecutive steps.
    pub fn run(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// One growth attempt from `origin` in a freshly sampled direction.
    fn attempt(&mut self, origin: NodeId, origin_pos: Vec2, now: Tick) -> Attempt {
        let angle = sampling::sample_angle(self.cfg.direction, &mut self.rng);
        let Some(candidate) = self.find_valid_position(origin_pos, angle) else {
            trace!(origin, angle, "no room along heading");
            return Attempt::Abandoned;
        };

        if let Some((dist, existing)) = self.graph.nearest(candidate)
            && dist < self.cfg.merge_distance
        {
            self.graph.add_road(origin, existing, now);
            trace!(origin, existing, "merged into existing node");
            return Attempt::Merged;
        }

        match self.graph.add_node(candidate) {
            Some(id) => {
                self.frontier.push(id);
                self.graph.add_road(origin, id, now);
                Attempt::Created(id)
            }
            None => Attempt::Abandoned,
        }
    }

    /// Walks the radius ladder outward along `angle` and returns the first
    /// candidate that respects the spacing rule.
    fn find_valid_position(&mut self, base: Vec2, angle: f32) -> Option<Vec2> {
        let heading = Vec2::from_angle(angle);
        let snap = self.cfg.snap_grid;
        sampling::radius_ladder(self.cfg.min_distance, self.cfg.radius_samples)
            .map(|r| {
                let raw = base + heading * r;
                match snap {
                    Some(pitch) => sampling::snap_to_grid(raw, pitch),
                    None => raw,
                }
            })
            .find(|&p| self.graph.is_valid_position(p))
    }

    #[inline]
    pub fn current_time(&self) -> Tick {
        self.clock.now()
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[inline]
    pub fn road_count(&self) -> usize {
        self.graph.road_count()
    }

    #[inline]
    pub fn position_of(&self, id: NodeId) -> Option<Vec2> {
        self.graph.position_of(id)
    }

    pub fn roads(&self) -> impl Iterator<Item = &Road> + '_ {
        self.graph.roads()
    }

    #[inline]
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    #[inline]
    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn stats(&self) -> NetworkStats {
        NetworkStats {
            nodes: self.graph.node_count(),
            roads: self.graph.road_count(),
            time: self.clock.now(),
            frontier: self.frontier.len(),
        }
    }
}

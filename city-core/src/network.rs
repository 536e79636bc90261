//! Nodes, roads, and the spacing rule that keeps nodes apart.

use ahash::{HashMap, HashMapExt};
use glam::Vec2;
use tracing::trace;

use crate::{
    config::RebuildPolicy,
    spatial::SpatialIndex,
    types::{NodeId, Tick},
};

/// Canonical identity of an undirected road: `(min, max)` of its endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoadKey(NodeId, NodeId);

impl RoadKey {
    /// Canonicalizes an endpoint pair. Self-loops have no key.
    pub fn new(a: NodeId, b: NodeId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self(a, b)),
            std::cmp::Ordering::Greater => Some(Self(b, a)),
            std::cmp::Ordering::Equal => None,
        }
    }

    #[inline]
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.0, self.1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Road {
    pub key: RoadKey,
    pub created_at: Tick,
}

impl Road {
    #[inline]
    pub fn a(&self) -> NodeId {
        self.key.0
    }

    #[inline]
    pub fn b(&self) -> NodeId {
        self.key.1
    }

    /// Steps elapsed since the road was laid.
    #[inline]
    pub fn age(&self, now: Tick) -> Tick {
        now.saturating_sub(self.created_at)
    }
}

#[derive(Debug)]
pub struct NetworkGraph {
    positions: Vec<Vec2>,
    /// Roads in creation order.
    roads: Vec<Road>,
    /// Position of each road in `roads`.
    road_index: HashMap<RoadKey, usize>,
    index: SpatialIndex,
    rebuild: RebuildPolicy,
    reject_distance: f32,
}

impl NetworkGraph {
    pub fn new(reject_distance: f32, rebuild: RebuildPolicy) -> Self {
        Self {
            positions: Vec::with_capacity(1024),
            roads: Vec::with_capacity(1024),
            road_index: HashMap::new(),
            index: SpatialIndex::new(),
            rebuild,
            reject_distance,
        }
    }

    #[inline]
    pub fn reject_distance(&self) -> f32 {
        self.reject_distance
    }

    /// Brings the index up to date according to the rebuild policy.
    fn refresh_index(&mut self) {
        if !self.index.is_stale() {
            return;
        }
        let pending = self.positions.len() - self.index.indexed_len();
        let due = match self.rebuild {
            RebuildPolicy::Lazy => true,
            RebuildPolicy::Every(k) => pending >= k || self.index.indexed_len() == 0,
        };
        if due {
            self.index.rebuild(&self.positions);
            trace!(nodes = self.positions.len(), "spatial index rebuilt");
        }
    }

    /// Closest existing node to `pos`, or `None` for an empty graph or a
    /// non-finite `pos`.
    ///
    /// Positions inserted since the last rebuild are scanned directly, so
    /// the answer always covers every node.
    pub fn nearest(&mut self, pos: Vec2) -> Option<(f32, NodeId)> {
        if !pos.is_finite() {
            return None;
        }
        self.refresh_index();

        let start = self.index.indexed_len();
        let pending = self.positions[start..]
            .iter()
            .enumerate()
            .map(|(i, p)| (p.distance(pos), start + i));

        self.index
            .nearest(pos)
            .into_iter()
            .chain(pending)
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }

    /// Whether a brand-new node could be placed at `pos`.
    ///
    /// Non-finite positions are never valid.
    pub fn is_valid_position(&mut self, pos: Vec2) -> bool {
        if !pos.is_finite() {
            return false;
        }
        match self.nearest(pos) {
            Some((dist, _)) => dist >= self.reject_distance,
            None => true,
        }
    }

    /// Inserts a node if it respects the spacing rule.
    ///
    /// The caller is responsible for scheduling the new node for growth.
    pub fn add_node(&mut self, pos: Vec2) -> Option<NodeId> {
        if !self.is_valid_position(pos) {
            return None;
        }
        let id = self.positions.len();
        self.positions.push(pos);
        self.index.mark_stale();
        Some(id)
    }

    /// Connects two nodes unless they are the same node or already joined.
    ///
    /// Returns `true` if a road was inserted. An existing road keeps its
    /// original timestamp.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, timestamp: Tick) -> bool {
        let Some(key) = RoadKey::new(a, b) else {
            return false;
        };
        if self.road_index.contains_key(&key) {
            return false;
        }
        self.road_index.insert(key, self.roads.len());
        self.roads.push(Road {
            key,
            created_at: timestamp,
        });
        true
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    #[inline]
    pub fn position_of(&self, id: NodeId) -> Option<Vec2> {
        self.positions.get(id).copied()
    }

    #[inline]
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn roads(&self) -> impl Iterator<Item = &Road> + '_ {
        self.roads.iter()
    }

    pub fn contains_road(&self, a: NodeId, b: NodeId) -> bool {
        RoadKey::new(a, b).is_some_and(|k| self.road_index.contains_key(&k))
    }

    /// Creation time of the road between `a` and `b`, if any.
    pub fn road_created_at(&self, a: NodeId, b: NodeId) -> Option<Tick> {
        let key = RoadKey::new(a, b)?;
        let &i = self.road_index.get(&key)?;
        Some(self.roads[i].created_at)
    }

    /// Axis-aligned bounding box of all node positions.
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> NetworkGraph {
        NetworkGraph::new(1.0, RebuildPolicy::Lazy)
    }

    #[test]
    fn road_key_is_canonical_and_rejects_self_loops() {
        assert_eq!(RoadKey::new(3, 1), RoadKey::new(1, 3));
        assert_eq!(RoadKey::new(3, 1).unwrap().endpoints(), (1, 3));
        assert_eq!(RoadKey::new(2, 2), None);
    }

    #[test]
    fn add_node_assigns_sequential_ids() {
        let mut g = graph();
        assert_eq!(g.add_node(Vec2::new(0.0, 0.0)), Some(0));
        assert_eq!(g.add_node(Vec2::new(2.0, 0.0)), Some(1));
        assert_eq!(g.add_node(Vec2::new(0.0, 2.0)), Some(2));
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.position_of(1), Some(Vec2::new(2.0, 0.0)));
        assert_eq!(g.position_of(9), None);
    }

    #[test]
    fn add_node_enforces_spacing() {
        let mut g = graph();
        g.add_node(Vec2::ZERO).unwrap();

        assert_eq!(g.add_node(Vec2::new(0.5, 0.0)), None);
        assert_eq!(g.node_count(), 1);

        // Exactly at the reject distance is allowed.
        assert_eq!(g.add_node(Vec2::new(1.0, 0.0)), Some(1));
    }

    #[test]
    fn non_finite_positions_are_never_valid() {
        let mut g = graph();
        assert!(!g.is_valid_position(Vec2::new(f32::INFINITY, 0.0)));
        assert_eq!(g.add_node(Vec2::new(0.0, f32::NAN)), None);

        g.add_node(Vec2::ZERO).unwrap();
        assert_eq!(g.nearest(Vec2::new(f32::NEG_INFINITY, 1.0)), None);
        assert_eq!(g.add_node(Vec2::splat(f32::INFINITY)), None);
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn road_created_at_finds_each_road_by_key() {
        let mut g = graph();
        for i in 0..5 {
            g.add_node(Vec2::new(i as f32 * 2.0, 0.0)).unwrap();
        }
        g.add_road(0, 1, 3);
        g.add_road(4, 2, 7);
        g.add_road(3, 1, 11);

        assert_eq!(g.road_created_at(1, 0), Some(3));
        assert_eq!(g.road_created_at(2, 4), Some(7));
        assert_eq!(g.road_created_at(1, 3), Some(11));
        assert_eq!(g.road_created_at(0, 4), None);
        assert_eq!(g.road_created_at(2, 2), None);
    }

    #[test]
    fn first_node_is_always_accepted() {
        let mut g = graph();
        assert!(g.is_valid_position(Vec2::new(123.0, -4.0)));
        assert_eq!(g.nearest(Vec2::ZERO), None);
        assert_eq!(g.add_node(Vec2::new(123.0, -4.0)), Some(0));
    }

    #[test]
    fn insertion_marks_index_stale_and_query_rebuilds() {
        let mut g = graph();
        g.add_node(Vec2::ZERO).unwrap();
        assert!(g.index.is_stale());

        let (d, id) = g.nearest(Vec2::new(0.0, 3.0)).unwrap();
        assert_eq!(id, 0);
        assert!((d - 3.0).abs() < 1e-6);
        assert!(!g.index.is_stale());
        assert_eq!(g.index.indexed_len(), 1);
    }

    #[test]
    fn cadence_policy_still_sees_pending_nodes() {
        let mut g = NetworkGraph::new(1.0, RebuildPolicy::Every(10));
        for i in 0..5 {
            g.add_node(Vec2::new(i as f32 * 2.0, 0.0)).unwrap();
        }
        // Only the first node made it into the tree.
        assert_eq!(g.index.indexed_len(), 1);

        let (d, id) = g.nearest(Vec2::new(8.1, 0.0)).unwrap();
        assert_eq!(id, 4);
        assert!((d - 0.1).abs() < 1e-5);
        assert_eq!(g.add_node(Vec2::new(8.5, 0.0)), None);
    }

    #[test]
    fn cadence_policy_rebuilds_after_k_insertions() {
        let mut g = NetworkGraph::new(1.0, RebuildPolicy::Every(3));
        for i in 0..4 {
            g.add_node(Vec2::new(i as f32 * 2.0, 0.0)).unwrap();
        }
        g.nearest(Vec2::ZERO);
        assert_eq!(g.index.indexed_len(), 4);
    }

    #[test]
    fn add_road_rejects_self_loops() {
        let mut g = graph();
        g.add_node(Vec2::ZERO).unwrap();
        assert!(!g.add_road(0, 0, 1));
        assert_eq!(g.road_count(), 0);
    }

    #[test]
    fn add_road_is_idempotent_and_keeps_first_timestamp() {
        let mut g = graph();
        g.add_node(Vec2::ZERO).unwrap();
        g.add_node(Vec2::new(2.0, 0.0)).unwrap();

        assert!(g.add_road(0, 1, 5));
        assert!(!g.add_road(1, 0, 9));
        assert!(!g.add_road(0, 1, 12));

        assert_eq!(g.road_count(), 1);
        assert_eq!(g.road_created_at(1, 0), Some(5));
        assert!(g.contains_road(1, 0));

        let road = g.roads().next().unwrap();
        assert_eq!((road.a(), road.b()), (0, 1));
        assert_eq!(road.age(12), 7);
    }

    #[test]
    fn roads_iterate_in_creation_order() {
        let mut g = graph();
        for i in 0..4 {
            g.add_node(Vec2::new(i as f32 * 2.0, 0.0)).unwrap();
        }
        g.add_road(3, 2, 1);
        g.add_road(0, 1, 2);
        g.add_road(1, 2, 3);

        let stamps: Vec<Tick> = g.roads().map(|r| r.created_at).collect();
        assert_eq!(stamps, vec![1, 2, 3]);
    }

    #[test]
    fn bounds_cover_all_nodes() {
        let mut g = graph();
        assert_eq!(g.bounds(), None);
        g.add_node(Vec2::new(1.0, -2.0)).unwrap();
        g.add_node(Vec2::new(-3.0, 4.0)).unwrap();
        assert_eq!(
            g.bounds(),
            Some((Vec2::new(-3.0, -2.0), Vec2::new(1.0, 4.0)))
        );
    }
}

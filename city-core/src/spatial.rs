//! Nearest-neighbour index over node positions.
//!
//! The index is a derived view: it copies `(position, id)` pairs out of the
//! graph's position store and can always be rebuilt from scratch. The graph
//! decides when to rebuild; the index only tracks whether it is behind.

use glam::Vec2;
use rstar::{RTree, primitives::GeomWithData};

use crate::types::NodeId;

type Entry = GeomWithData<[f32; 2], NodeId>;

#[derive(Default)]
pub struct SpatialIndex {
    tree: RTree<Entry>,
    /// Number of leading positions covered by `tree`.
    indexed: usize,
    stale: bool,
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("indexed", &self.indexed)
            .field("stale", &self.stale)
            .finish()
    }
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    #[inline]
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Number of positions the current tree was built over. Ids at or past
    /// this value are not visible to [`SpatialIndex::nearest`].
    #[inline]
    pub fn indexed_len(&self) -> usize {
        self.indexed
    }

    /// Replaces the tree with one bulk-loaded over `positions`, where the
    /// slice index is the node id. An empty slice leaves an empty index.
    pub fn rebuild(&mut self, positions: &[Vec2]) {
        let entries: Vec<Entry> = positions
            .iter()
            .enumerate()
            .map(|(id, p)| GeomWithData::new(p.to_array(), id))
            .collect();
        self.tree = RTree::bulk_load(entries);
        self.indexed = positions.len();
        self.stale = false;
    }

    /// Distance to, and id of, the closest indexed position.
    ///
    /// Returns `None` when nothing is indexed.
    pub fn nearest(&self, query: Vec2) -> Option<(f32, NodeId)> {
        self.tree.nearest_neighbor(&query.to_array()).map(|e| {
            let dist = Vec2::from_array(*e.geom()).distance(query);
            (dist, e.data)
        })
    }
}

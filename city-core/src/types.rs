/// Identifier for a node in a [`crate::network::NetworkGraph`].
///
/// This is an index into the graph's position store, assigned in insertion
/// order, and is only meaningful within the lifetime of a given graph.
pub type NodeId = usize;

/// Simulation time, in growth steps.
pub type Tick = u64;

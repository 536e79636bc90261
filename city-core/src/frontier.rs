use std::collections::VecDeque;

use crate::types::NodeId;

/// FIFO of nodes waiting for their growth turn.
#[derive(Debug, Default)]
pub struct GrowthFrontier {
    queue: VecDeque<NodeId>,
}

impl GrowthFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, id: NodeId) {
        self.queue.push_back(id);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<NodeId> {
        self.queue.pop_front()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Reseeds an exhausted frontier with the id produced by `supplier`.
    ///
    /// Does nothing if the frontier still holds work or the supplier has
    /// nothing to offer. Returns the pushed id.
    pub fn recover(&mut self, supplier: impl FnOnce() -> Option<NodeId>) -> Option<NodeId> {
        if !self.is_empty() {
            return None;
        }
        let id = supplier()?;
        self.push(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_insertion_order() {
        let mut f = GrowthFrontier::new();
        f.push(4);
        f.push(1);
        f.push(7);
        assert_eq!(f.len(), 3);
        assert_eq!(f.pop(), Some(4));
        assert_eq!(f.pop(), Some(1));
        assert_eq!(f.pop(), Some(7));
        assert_eq!(f.pop(), None);
        assert!(f.is_empty());
    }

    #[test]
    fn recover_pushes_supplied_id_when_empty() {
        let mut f = GrowthFrontier::new();
        assert_eq!(f.recover(|| Some(3)), Some(3));
        assert_eq!(f.len(), 1);
        assert_eq!(f.pop(), Some(3));
    }

    #[test]
    fn recover_is_a_no_op_when_work_remains() {
        let mut f = GrowthFrontier::new();
        f.push(0);
        let mut called = false;
        assert_eq!(
            f.recover(|| {
                called = true;
                Some(9)
            }),
            None
        );
        assert!(!called);
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn recover_without_candidates_leaves_frontier_empty() {
        let mut f = GrowthFrontier::new();
        assert_eq!(f.recover(|| None), None);
        assert!(f.is_empty());
    }
}

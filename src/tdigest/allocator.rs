//! Slot allocator for tree node handles.
//!
//! Handles are small integers drawn from a monotonic counter. Released handles go onto a
//! stack and are handed out again before the counter advances (LIFO reuse), which keeps the
//! parallel node arrays dense.

use crate::{TdError, TdResult};
use serde::{Deserialize, Serialize};

/// Handle to a node slot in an [`IntAvlTree`](crate::tdigest::IntAvlTree).
///
/// `NodeId::NIL` (0) is the reserved "no node" sentinel; live nodes are always `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub const NIL: NodeId = NodeId(0);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        NodeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_nil(self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone)]
pub struct NodeAllocator {
    next_node: u32,
    released: Vec<NodeId>,
}

impl Default for NodeAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeAllocator {
    pub fn new() -> Self {
        Self {
            next_node: NodeId::NIL.raw() + 1,
            released: Vec::new(),
        }
    }

    /// Most recently released handle first, otherwise a fresh one from the counter.
    pub fn new_node(&mut self) -> NodeId {
        if let Some(node) = self.released.pop() {
            return node;
        }
        let node = NodeId(self.next_node);
        self.next_node += 1;
        node
    }

    /// Return `node` to the free list.
    ///
    /// Fails with [`TdError::InvalidState`] for NIL or for a handle the counter never reached.
    pub fn release(&mut self, node: NodeId) -> TdResult<()> {
        if node.is_nil() {
            return Err(TdError::InvalidState {
                what: "released the NIL handle",
            });
        }
        if node.0 >= self.next_node {
            return Err(TdError::InvalidState {
                what: "released a handle that was never issued",
            });
        }
        self.released.push(node);
        Ok(())
    }

    /// Number of handles currently issued and not released.
    #[inline]
    pub fn live_count(&self) -> usize {
        (self.next_node as usize) - 1 - self.released.len()
    }

    /// Upper bound (exclusive) of handles issued so far.
    #[inline]
    pub fn high_water(&self) -> u32 {
        self.next_node
    }

    pub fn clear(&mut self) {
        self.next_node = NodeId::NIL.raw() + 1;
        self.released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_handles_start_at_one() {
        let mut a = NodeAllocator::new();
        assert_eq!(a.new_node(), NodeId::from_raw(1));
        assert_eq!(a.new_node(), NodeId::from_raw(2));
        assert_eq!(a.new_node(), NodeId::from_raw(3));
        assert_eq!(a.live_count(), 3);
    }

    #[test]
    fn release_then_new_reuses_lifo() {
        let mut a = NodeAllocator::new();
        let h1 = a.new_node();
        let h2 = a.new_node();
        let _h3 = a.new_node();

        a.release(h1).unwrap();
        a.release(h2).unwrap();
        assert_eq!(a.live_count(), 1);

        assert_eq!(a.new_node(), h2);
        assert_eq!(a.new_node(), h1);
        // free list exhausted: counter resumes
        assert_eq!(a.new_node(), NodeId::from_raw(4));
        assert_eq!(a.live_count(), 4);
        assert_eq!(a.high_water(), 5);
    }

    #[test]
    fn release_of_never_issued_handle_is_invalid_state() {
        let mut a = NodeAllocator::new();
        let _ = a.new_node();
        let err = a.release(NodeId::from_raw(7)).unwrap_err();
        assert!(matches!(err, TdError::InvalidState { .. }));
        let err = a.release(NodeId::NIL).unwrap_err();
        assert!(matches!(err, TdError::InvalidState { .. }));
        assert_eq!(a.live_count(), 1);
    }

    #[test]
    fn clear_resets_counter() {
        let mut a = NodeAllocator::new();
        for _ in 0..5 {
            a.new_node();
        }
        a.release(NodeId::from_raw(3)).unwrap();
        a.clear();
        assert_eq!(a.live_count(), 0);
        assert_eq!(a.high_water(), 1);
        assert_eq!(a.new_node(), NodeId::from_raw(1));
    }
}

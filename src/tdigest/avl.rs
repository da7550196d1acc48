//! Arena-indexed AVL tree over integer node handles.
//!
//! Nodes live in parallel arrays (`parent`, `left`, `right`, `depth`, `values`) indexed by
//! [`NodeId`]. Handle `0` is the NIL sentinel and always has depth `0`, so child lookups never
//! need a special case for "missing".
//!
//! Key comparison, payload construction and duplicate merging are delegated to a
//! [`NodePolicy`]. The same tree therefore serves centroids, counted bags, or any other
//! payload with a strict total order.
//!
//! # Invariants
//! - For every live node: `depth = 1 + max(depth(left), depth(right))`.
//! - For every live node: `|depth(left) - depth(right)| <= 1`.
//! - In-order traversal is sorted under the policy.
//! - A handle is never reused while it is live.
//!
//! # Growth
//! When the allocator hands out a handle past the end of the arrays, every array grows to
//! `oversize(handle + 1)` (≈12.5% headroom), so total copy work stays O(n) over n inserts.

use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, trace};

use crate::tdigest::allocator::{NodeAllocator, NodeId};
use crate::{TdError, TdResult};

const NIL: NodeId = NodeId::NIL;

/// Default number of node slots (including the NIL slot) for a fresh tree.
pub const DEFAULT_CAPACITY: usize = 16;

/// `size + size/8`: the growth target whenever a handle outruns capacity.
#[inline]
pub(crate) fn oversize(size: usize) -> usize {
    size + (size >> 3)
}

/// Ordering + payload policy plugged into an [`IntAvlTree`].
///
/// `compare` must define a strict total order, and must agree with `merge`: whenever it reports
/// `Equal` the tree routes the key to `merge` and never to `copy`.
pub trait NodePolicy {
    /// What callers hand to `insert`/`find`/`update`.
    type Key;
    /// What the tree stores per node.
    type Value;

    /// Order of `key` relative to the payload already stored at a node.
    fn compare(&self, key: &Self::Key, stored: &Self::Value) -> Ordering;

    /// Materialize `key` as a fresh payload (new node or in-place update).
    fn copy(&mut self, key: Self::Key) -> Self::Value;

    /// Fold `key` into an existing payload. Repeated merges must converge regardless of order.
    fn merge(&mut self, key: Self::Key, stored: &mut Self::Value);
}

/// Outcome of [`IntAvlTree::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// No equal key existed; a node was allocated.
    Created(NodeId),
    /// The key compared equal to this node and was merged into it.
    Merged(NodeId),
}

impl Insertion {
    #[inline]
    pub fn node(self) -> NodeId {
        match self {
            Insertion::Created(n) | Insertion::Merged(n) => n,
        }
    }

    #[inline]
    pub fn is_created(self) -> bool {
        matches!(self, Insertion::Created(_))
    }
}

#[inline]
fn non_nil(node: NodeId) -> Option<NodeId> {
    if node.is_nil() {
        None
    } else {
        Some(node)
    }
}

/// Generic AVL tree whose nodes are addressed by [`NodeId`] handles.
///
/// Single-writer: every mutation takes `&mut self`.
pub struct IntAvlTree<P: NodePolicy> {
    policy: P,
    allocator: NodeAllocator,
    root: NodeId,
    parent: Vec<NodeId>,
    left: Vec<NodeId>,
    right: Vec<NodeId>,
    depth: Vec<u8>,
    values: Vec<Option<P::Value>>,
}

impl<P> Clone for IntAvlTree<P>
where
    P: NodePolicy + Clone,
    P::Value: Clone,
{
    fn clone(&self) -> Self {
        Self {
            policy: self.policy.clone(),
            allocator: self.allocator.clone(),
            root: self.root,
            parent: self.parent.clone(),
            left: self.left.clone(),
            right: self.right.clone(),
            depth: self.depth.clone(),
            values: self.values.clone(),
        }
    }
}

impl<P: NodePolicy> fmt::Debug for IntAvlTree<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntAvlTree")
            .field("len", &self.len())
            .field("root", &self.root)
            .field("depth", &self.depth_of(self.root))
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

impl<P: NodePolicy> IntAvlTree<P> {
    pub fn new(policy: P) -> Self {
        Self::with_capacity(policy, DEFAULT_CAPACITY)
    }

    /// `capacity` counts node slots including the NIL slot; it is raised to at least 1.
    pub fn with_capacity(policy: P, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut values = Vec::with_capacity(capacity);
        values.resize_with(capacity, || None);
        Self {
            policy,
            allocator: NodeAllocator::new(),
            root: NIL,
            parent: vec![NIL; capacity],
            left: vec![NIL; capacity],
            right: vec![NIL; capacity],
            depth: vec![0; capacity],
            values,
        }
    }

    /* ===========================
     * Accessors
     * =========================== */

    #[inline]
    pub fn capacity(&self) -> usize {
        self.parent.len()
    }

    /// Number of live nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.allocator.live_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_nil()
    }

    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        non_nil(self.root)
    }

    #[inline]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    #[inline]
    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    /// `true` iff `node` is allocated and holds a payload.
    #[inline]
    pub fn is_live(&self, node: NodeId) -> bool {
        !node.is_nil() && matches!(self.values.get(node.index()), Some(Some(_)))
    }

    #[inline]
    pub fn get(&self, node: NodeId) -> Option<&P::Value> {
        if node.is_nil() {
            return None;
        }
        self.values.get(node.index())?.as_ref()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.live(node).and_then(|n| non_nil(self.parent_of(n)))
    }

    pub fn left(&self, node: NodeId) -> Option<NodeId> {
        self.live(node).and_then(|n| non_nil(self.left_of(n)))
    }

    pub fn right(&self, node: NodeId) -> Option<NodeId> {
        self.live(node).and_then(|n| non_nil(self.right_of(n)))
    }

    /// Height of the subtree rooted at `node`; `0` for NIL or a dead handle.
    pub fn depth(&self, node: NodeId) -> u8 {
        self.live(node).map_or(0, |n| self.depth_of(n))
    }

    /* ===========================
     * Navigation
     * =========================== */

    /// Leftmost node of the subtree rooted at `node`.
    pub fn first(&self, node: NodeId) -> Option<NodeId> {
        self.live(node).map(|n| self.first_raw(n))
    }

    /// Rightmost node of the subtree rooted at `node`.
    pub fn last(&self, node: NodeId) -> Option<NodeId> {
        self.live(node).map(|n| self.last_raw(n))
    }

    /// In-order successor.
    pub fn next(&self, node: NodeId) -> Option<NodeId> {
        self.live(node).and_then(|n| non_nil(self.next_raw(n)))
    }

    /// In-order predecessor.
    pub fn prev(&self, node: NodeId) -> Option<NodeId> {
        self.live(node).and_then(|n| non_nil(self.prev_raw(n)))
    }

    /// In-order iterator over `(handle, payload)`.
    pub fn iter(&self) -> Iter<'_, P> {
        Iter {
            tree: self,
            front: if self.root.is_nil() {
                NIL
            } else {
                self.first_raw(self.root)
            },
            back: if self.root.is_nil() {
                NIL
            } else {
                self.last_raw(self.root)
            },
            remaining: self.len(),
        }
    }

    /* ===========================
     * Search
     * =========================== */

    /// Node whose payload compares equal to `key`.
    pub fn find(&self, key: &P::Key) -> Option<NodeId> {
        let mut node = self.root;
        while !node.is_nil() {
            match self.policy.compare(key, self.value_at(node)) {
                Ordering::Less => node = self.left_of(node),
                Ordering::Greater => node = self.right_of(node),
                Ordering::Equal => return Some(node),
            }
        }
        None
    }

    /// Last node whose payload is `<=` the target.
    ///
    /// `cmp(stored)` reports the target's order relative to `stored`, like
    /// [`NodePolicy::compare`]. It may be coarser than the policy order (e.g. by mean only), but
    /// must be monotone over the in-order sequence.
    pub fn floor_by<F>(&self, mut cmp: F) -> Option<NodeId>
    where
        F: FnMut(&P::Value) -> Ordering,
    {
        let mut node = self.root;
        let mut best = NIL;
        while !node.is_nil() {
            if cmp(self.value_at(node)) == Ordering::Less {
                node = self.left_of(node);
            } else {
                best = node;
                node = self.right_of(node);
            }
        }
        non_nil(best)
    }

    /// First node whose payload is `>=` the target.
    pub fn ceiling_by<F>(&self, mut cmp: F) -> Option<NodeId>
    where
        F: FnMut(&P::Value) -> Ordering,
    {
        let mut node = self.root;
        let mut best = NIL;
        while !node.is_nil() {
            if cmp(self.value_at(node)) == Ordering::Greater {
                node = self.right_of(node);
            } else {
                best = node;
                node = self.left_of(node);
            }
        }
        non_nil(best)
    }

    /* ===========================
     * Mutation
     * =========================== */

    /// Insert `key`, merging into an equal node if one exists.
    pub fn insert(&mut self, key: P::Key) -> Insertion {
        if self.root.is_nil() {
            let node = self.alloc_node();
            self.values[node.index()] = Some(self.policy.copy(key));
            self.root = node;
            self.fix_aggregates(node);
            return Insertion::Created(node);
        }

        debug_assert!(self.parent_of(self.root).is_nil());
        let mut node = self.root;
        let mut parent;
        let mut cmp;
        loop {
            cmp = self.policy.compare(&key, self.value_at(node));
            parent = node;
            match cmp {
                Ordering::Less => node = self.left_of(node),
                Ordering::Greater => node = self.right_of(node),
                Ordering::Equal => {
                    if let Some(stored) = self.values[node.index()].as_mut() {
                        self.policy.merge(key, stored);
                    }
                    return Insertion::Merged(node);
                }
            }
            if node.is_nil() {
                break;
            }
        }

        let node = self.alloc_node();
        self.values[node.index()] = Some(self.policy.copy(key));
        self.set_parent(node, parent);
        if cmp == Ordering::Less {
            self.set_left(parent, node);
        } else {
            debug_assert!(cmp == Ordering::Greater);
            self.set_right(parent, node);
        }
        self.rebalance(node);
        Insertion::Created(node)
    }

    /// Replace the payload at `node` with `copy(key)`.
    ///
    /// Stays in place when `key` still sorts strictly between the node's neighbours; otherwise
    /// the node is removed and `key` re-inserted. Returns the handle now holding `key` (which
    /// is an existing node if the re-insert merged).
    pub fn update(&mut self, node: NodeId, key: P::Key) -> TdResult<NodeId> {
        if !self.is_live(node) {
            return Err(TdError::InvalidArgument {
                what: "update of a node that is not live",
            });
        }
        let prev = self.prev_raw(node);
        let next = self.next_raw(node);
        let after_prev =
            prev.is_nil() || self.policy.compare(&key, self.value_at(prev)) == Ordering::Greater;
        let before_next =
            next.is_nil() || self.policy.compare(&key, self.value_at(next)) == Ordering::Less;

        if after_prev && before_next {
            self.values[node.index()] = Some(self.policy.copy(key));
            let mut n = node;
            while !n.is_nil() {
                self.fix_aggregates(n);
                n = self.parent_of(n);
            }
            Ok(node)
        } else {
            debug!(node = node.raw(), "update moves key; re-inserting");
            self.remove(node)?;
            Ok(self.insert(key).node())
        }
    }

    /// Unlink `node`, release its handle and hand back its payload.
    pub fn remove(&mut self, node: NodeId) -> TdResult<P::Value> {
        if node.is_nil() {
            return Err(TdError::InvalidArgument {
                what: "cannot remove NIL",
            });
        }
        if !self.is_live(node) {
            return Err(TdError::InvalidArgument {
                what: "remove of a node that is not live",
            });
        }

        if !self.left_of(node).is_nil() && !self.right_of(node).is_nil() {
            // inner node: trade places with the successor, which has no left child
            let next = self.next_raw(node);
            debug_assert!(!next.is_nil());
            self.swap(node, next);
        }
        debug_assert!(self.left_of(node).is_nil() || self.right_of(node).is_nil());

        let parent = self.parent_of(node);
        let mut child = self.left_of(node);
        if child.is_nil() {
            child = self.right_of(node);
        }

        if child.is_nil() {
            if node == self.root {
                debug_assert!(self.len() == 1);
                self.root = NIL;
            } else if node == self.left_of(parent) {
                self.set_left(parent, NIL);
            } else {
                debug_assert!(node == self.right_of(parent));
                self.set_right(parent, NIL);
            }
        } else {
            if node == self.root {
                debug_assert!(self.len() == 2);
                self.root = child;
            } else if node == self.left_of(parent) {
                self.set_left(parent, child);
            } else {
                debug_assert!(node == self.right_of(parent));
                self.set_right(parent, child);
            }
            self.set_parent(child, parent);
        }

        let value = self.release(node)?;
        self.rebalance(parent);
        Ok(value)
    }

    /// Drop every node; capacity is kept.
    pub fn clear(&mut self) {
        self.allocator.clear();
        self.root = NIL;
        self.parent.fill(NIL);
        self.left.fill(NIL);
        self.right.fill(NIL);
        self.depth.fill(0);
        self.values.iter_mut().for_each(|v| *v = None);
    }

    /* ===========================
     * Verification
     * =========================== */

    /// Recursively check links, depths, balance and the live count.
    ///
    /// Not run in normal operation; callers use it in tests and behind `debug_assert!`.
    pub fn validate(&self) -> TdResult<()> {
        if self.depth[NIL.index()] != 0 {
            return Err(TdError::Invariant {
                what: "NIL slot has non-zero depth",
            });
        }
        if !self.root.is_nil() && !self.parent_of(self.root).is_nil() {
            return Err(TdError::Invariant {
                what: "root has a parent",
            });
        }
        let reachable = self.check_subtree(self.root)?;
        if reachable != self.len() {
            return Err(TdError::Invariant {
                what: "reachable node count differs from live count",
            });
        }
        Ok(())
    }

    fn check_subtree(&self, node: NodeId) -> TdResult<usize> {
        if node.is_nil() {
            return Ok(0);
        }
        if !self.is_live(node) {
            return Err(TdError::Invariant {
                what: "linked node has no payload",
            });
        }
        let (l, r) = (self.left_of(node), self.right_of(node));
        if !l.is_nil() && self.parent_of(l) != node {
            return Err(TdError::Invariant {
                what: "left child does not point back to its parent",
            });
        }
        if !r.is_nil() && self.parent_of(r) != node {
            return Err(TdError::Invariant {
                what: "right child does not point back to its parent",
            });
        }
        let (dl, dr) = (self.depth_of(l), self.depth_of(r));
        if self.depth_of(node) != 1 + dl.max(dr) {
            return Err(TdError::Invariant {
                what: "depth is not 1 + max(child depths)",
            });
        }
        if dl.abs_diff(dr) > 1 {
            return Err(TdError::Invariant {
                what: "subtree heights differ by more than one",
            });
        }
        Ok(1 + self.check_subtree(l)? + self.check_subtree(r)?)
    }

    /* ===========================
     * Raw node plumbing
     * =========================== */

    #[inline]
    fn live(&self, node: NodeId) -> Option<NodeId> {
        if self.is_live(node) {
            Some(node)
        } else {
            None
        }
    }

    #[inline]
    fn value_at(&self, node: NodeId) -> &P::Value {
        match &self.values[node.index()] {
            Some(v) => v,
            None => panic!("tree node {} is linked but has no payload", node.raw()),
        }
    }

    #[inline]
    fn parent_of(&self, node: NodeId) -> NodeId {
        self.parent[node.index()]
    }
    #[inline]
    fn left_of(&self, node: NodeId) -> NodeId {
        self.left[node.index()]
    }
    #[inline]
    fn right_of(&self, node: NodeId) -> NodeId {
        self.right[node.index()]
    }
    #[inline]
    fn depth_of(&self, node: NodeId) -> u8 {
        self.depth[node.index()]
    }

    #[inline]
    fn set_parent(&mut self, node: NodeId, parent: NodeId) {
        debug_assert!(!node.is_nil());
        self.parent[node.index()] = parent;
    }
    #[inline]
    fn set_left(&mut self, node: NodeId, left: NodeId) {
        debug_assert!(!node.is_nil());
        self.left[node.index()] = left;
    }
    #[inline]
    fn set_right(&mut self, node: NodeId, right: NodeId) {
        debug_assert!(!node.is_nil());
        self.right[node.index()] = right;
    }

    fn first_raw(&self, mut node: NodeId) -> NodeId {
        loop {
            let left = self.left_of(node);
            if left.is_nil() {
                return node;
            }
            node = left;
        }
    }

    fn last_raw(&self, mut node: NodeId) -> NodeId {
        loop {
            let right = self.right_of(node);
            if right.is_nil() {
                return node;
            }
            node = right;
        }
    }

    fn next_raw(&self, mut node: NodeId) -> NodeId {
        let right = self.right_of(node);
        if !right.is_nil() {
            return self.first_raw(right);
        }
        let mut parent = self.parent_of(node);
        while !parent.is_nil() && node == self.right_of(parent) {
            node = parent;
            parent = self.parent_of(parent);
        }
        parent
    }

    fn prev_raw(&self, mut node: NodeId) -> NodeId {
        let left = self.left_of(node);
        if !left.is_nil() {
            return self.last_raw(left);
        }
        let mut parent = self.parent_of(node);
        while !parent.is_nil() && node == self.left_of(parent) {
            node = parent;
            parent = self.parent_of(parent);
        }
        parent
    }

    fn alloc_node(&mut self) -> NodeId {
        let node = self.allocator.new_node();
        if node.index() >= self.capacity() {
            self.resize(oversize(node.index() + 1));
        }
        node
    }

    /// Grow every parallel array together so handles and payloads stay one-to-one.
    fn resize(&mut self, new_capacity: usize) {
        debug!(
            from = self.capacity(),
            to = new_capacity,
            "growing tree node arrays"
        );
        self.parent.resize(new_capacity, NIL);
        self.left.resize(new_capacity, NIL);
        self.right.resize(new_capacity, NIL);
        self.depth.resize(new_capacity, 0);
        self.values.resize_with(new_capacity, || None);
    }

    fn release(&mut self, node: NodeId) -> TdResult<P::Value> {
        self.set_left(node, NIL);
        self.set_right(node, NIL);
        self.set_parent(node, NIL);
        self.depth[node.index()] = 0;
        self.allocator.release(node)?;
        self.values[node.index()].take().ok_or(TdError::Invariant {
            what: "released node had no payload",
        })
    }

    /// Exchange the structural positions of two nodes; payloads stay on their handles.
    fn swap(&mut self, node1: NodeId, node2: NodeId) {
        let parent1 = self.parent_of(node1);
        let parent2 = self.parent_of(node2);
        if !parent1.is_nil() {
            if node1 == self.left_of(parent1) {
                self.set_left(parent1, node2);
            } else {
                debug_assert!(node1 == self.right_of(parent1));
                self.set_right(parent1, node2);
            }
        } else {
            debug_assert!(self.root == node1);
            self.root = node2;
        }
        if !parent2.is_nil() {
            if node2 == self.left_of(parent2) {
                self.set_left(parent2, node1);
            } else {
                debug_assert!(node2 == self.right_of(parent2));
                self.set_right(parent2, node1);
            }
        } else {
            debug_assert!(self.root == node2);
            self.root = node1;
        }
        self.set_parent(node1, parent2);
        self.set_parent(node2, parent1);

        let left1 = self.left_of(node1);
        let left2 = self.left_of(node2);
        self.set_left(node1, left2);
        if !left2.is_nil() {
            self.set_parent(left2, node1);
        }
        self.set_left(node2, left1);
        if !left1.is_nil() {
            self.set_parent(left1, node2);
        }

        // reads happen after the parent-slot rewrite above: if node2 was node1's right
        // child, right1 is now node1 itself and ends up as node2's right child
        let right1 = self.right_of(node1);
        let right2 = self.right_of(node2);
        self.set_right(node1, right2);
        if !right2.is_nil() {
            self.set_parent(right2, node1);
        }
        self.set_right(node2, right1);
        if !right1.is_nil() {
            self.set_parent(right1, node2);
        }

        self.depth.swap(node1.index(), node2.index());
    }

    #[inline]
    fn balance_factor(&self, node: NodeId) -> i32 {
        i32::from(self.depth_of(self.left_of(node))) - i32::from(self.depth_of(self.right_of(node)))
    }

    fn rebalance(&mut self, node: NodeId) {
        let mut n = node;
        while !n.is_nil() {
            let p = self.parent_of(n);
            self.fix_aggregates(n);
            match self.balance_factor(n) {
                -2 => {
                    let right = self.right_of(n);
                    if self.balance_factor(right) == 1 {
                        self.rotate_right(right);
                    }
                    self.rotate_left(n);
                }
                2 => {
                    let left = self.left_of(n);
                    if self.balance_factor(left) == -1 {
                        self.rotate_left(left);
                    }
                    self.rotate_right(n);
                }
                -1..=1 => {}
                bf => debug_assert!(false, "balance factor {bf} at node {}", n.raw()),
            }
            n = p;
        }
    }

    #[inline]
    fn fix_aggregates(&mut self, node: NodeId) {
        let d = self
            .depth_of(self.left_of(node))
            .max(self.depth_of(self.right_of(node)));
        debug_assert!(d < u8::MAX - 1, "tree depth out of range");
        self.depth[node.index()] = d + 1;
    }

    fn rotate_left(&mut self, n: NodeId) {
        trace!(node = n.raw(), "rotate left");
        let r = self.right_of(n);
        let lr = self.left_of(r);
        self.set_right(n, lr);
        if !lr.is_nil() {
            self.set_parent(lr, n);
        }
        let p = self.parent_of(n);
        self.set_parent(r, p);
        if p.is_nil() {
            self.root = r;
        } else if self.left_of(p) == n {
            self.set_left(p, r);
        } else {
            debug_assert!(self.right_of(p) == n);
            self.set_right(p, r);
        }
        self.set_left(r, n);
        self.set_parent(n, r);
        self.fix_aggregates(n);
        self.fix_aggregates(r);
    }

    fn rotate_right(&mut self, n: NodeId) {
        trace!(node = n.raw(), "rotate right");
        let l = self.left_of(n);
        let rl = self.right_of(l);
        self.set_left(n, rl);
        if !rl.is_nil() {
            self.set_parent(rl, n);
        }
        let p = self.parent_of(n);
        self.set_parent(l, p);
        if p.is_nil() {
            self.root = l;
        } else if self.right_of(p) == n {
            self.set_right(p, l);
        } else {
            debug_assert!(self.left_of(p) == n);
            self.set_left(p, l);
        }
        self.set_right(l, n);
        self.set_parent(n, l);
        self.fix_aggregates(n);
        self.fix_aggregates(l);
    }
}

/// In-order iterator returned by [`IntAvlTree::iter`].
pub struct Iter<'a, P: NodePolicy> {
    tree: &'a IntAvlTree<P>,
    front: NodeId,
    back: NodeId,
    remaining: usize,
}

impl<'a, P: NodePolicy> Iterator for Iter<'a, P> {
    type Item = (NodeId, &'a P::Value);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front;
        self.front = self.tree.next_raw(node);
        self.remaining -= 1;
        Some((node, self.tree.value_at(node)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<P: NodePolicy> DoubleEndedIterator for Iter<'_, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back;
        self.back = self.tree.prev_raw(node);
        self.remaining -= 1;
        Some((node, self.tree.value_at(node)))
    }
}

impl<P: NodePolicy> ExactSizeIterator for Iter<'_, P> {}

impl<'a, P: NodePolicy> IntoIterator for &'a IntAvlTree<P> {
    type Item = (NodeId, &'a P::Value);
    type IntoIter = Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

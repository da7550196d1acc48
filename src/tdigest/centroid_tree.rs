// src/tdigest/centroid_tree.rs
use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tdigest::allocator::NodeId;
use crate::tdigest::avl::{self, Insertion, IntAvlTree, NodePolicy, DEFAULT_CAPACITY};
use crate::tdigest::centroids::{Centroid, CentroidIds};
use crate::{TdError, TdResult};

/// Tree policy for centroids: `(mean, id)` order, equal keys merge their weight and samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentroidOrder;

impl NodePolicy for CentroidOrder {
    type Key = Centroid;
    type Value = Centroid;

    #[inline]
    fn compare(&self, key: &Centroid, stored: &Centroid) -> Ordering {
        key.cmp(stored)
    }

    #[inline]
    fn copy(&mut self, key: Centroid) -> Centroid {
        key
    }

    #[inline]
    fn merge(&mut self, key: Centroid, stored: &mut Centroid) {
        // CentroidTree bounds the total weight before inserting, and with it every stored weight.
        let merged = stored.merge(&key);
        debug_assert!(merged.is_ok(), "centroid weight overflow in merge");
    }
}

/* =============================================================================
 * Options / Builder
 * ============================================================================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Node slots allocated up front (the tree grows by ~1/8 beyond this when needed).
    pub initial_capacity: usize,
    /// Keep the raw values that went into each centroid.
    pub record_samples: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            record_samples: false,
        }
    }
}

/// Builder for [`CentroidTree`].
#[derive(Debug, Clone, Default)]
pub struct CentroidTreeBuilder {
    options: TreeOptions,
    ids: Option<CentroidIds>,
}

impl CentroidTreeBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn initial_capacity(mut self, n: usize) -> Self {
        self.options.initial_capacity = n;
        self
    }

    #[inline]
    pub fn record_samples(mut self, on: bool) -> Self {
        self.options.record_samples = on;
        self
    }

    /// Draw centroid ids from `ids` instead of a private counter.
    #[inline]
    pub fn ids(mut self, ids: CentroidIds) -> Self {
        self.ids = Some(ids);
        self
    }

    #[inline]
    pub fn options(mut self, options: TreeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> CentroidTree {
        debug!(
            initial_capacity = self.options.initial_capacity,
            record_samples = self.options.record_samples,
            "building centroid tree"
        );
        CentroidTree {
            tree: IntAvlTree::with_capacity(CentroidOrder, self.options.initial_capacity),
            ids: self.ids.unwrap_or_default(),
            options: self.options,
            total_weight: 0,
        }
    }
}

#[inline]
fn ensure_finite(x: f64, context: &'static str) -> TdResult<()> {
    if x.is_finite() {
        Ok(())
    } else {
        Err(TdError::NonFiniteInput { context })
    }
}

#[inline]
fn ensure_positive_weight(w: u64) -> TdResult<()> {
    if w == 0 {
        return Err(TdError::InvalidArgument {
            what: "centroid weight must be positive",
        });
    }
    Ok(())
}

/* =============================================================================
 * Centroid tree
 * ============================================================================= */

/// Ordered centroid storage for a digest: an [`IntAvlTree`] keyed by `(mean, id)`.
///
/// The digest drives it by looking up neighbours with [`floor`](Self::floor) /
/// [`ceiling`](Self::ceiling), folding points in with [`add_to`](Self::add_to), and creating
/// new centroids with [`add`](Self::add). In-order traversal yields centroids by ascending mean.
#[derive(Debug, Clone)]
pub struct CentroidTree {
    tree: IntAvlTree<CentroidOrder>,
    ids: CentroidIds,
    options: TreeOptions,
    total_weight: u64,
}

impl Default for CentroidTree {
    fn default() -> Self {
        CentroidTreeBuilder::default().build()
    }
}

impl CentroidTree {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry point for fluent construction.
    #[inline]
    pub fn builder() -> CentroidTreeBuilder {
        CentroidTreeBuilder::default()
    }

    #[inline]
    pub fn with_options(options: TreeOptions) -> Self {
        Self::builder().options(options).build()
    }

    #[inline]
    pub fn options(&self) -> TreeOptions {
        self.options
    }

    #[inline]
    pub fn ids(&self) -> &CentroidIds {
        &self.ids
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }

    /// Height of the tree (0 when empty).
    #[inline]
    pub fn depth(&self) -> u8 {
        self.tree.root().map_or(0, |r| self.tree.depth(r))
    }

    /// ∑ weight over all centroids.
    #[inline]
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    #[inline]
    pub fn get(&self, node: NodeId) -> Option<&Centroid> {
        self.tree.get(node)
    }

    /// Borrow the underlying handle tree.
    #[inline]
    pub fn as_tree(&self) -> &IntAvlTree<CentroidOrder> {
        &self.tree
    }

    /* ===========================
     * Navigation
     * =========================== */

    /// Centroid with the smallest mean.
    pub fn first(&self) -> Option<NodeId> {
        self.tree.root().and_then(|r| self.tree.first(r))
    }

    /// Centroid with the largest mean.
    pub fn last(&self) -> Option<NodeId> {
        self.tree.root().and_then(|r| self.tree.last(r))
    }

    #[inline]
    pub fn next(&self, node: NodeId) -> Option<NodeId> {
        self.tree.next(node)
    }

    #[inline]
    pub fn prev(&self, node: NodeId) -> Option<NodeId> {
        self.tree.prev(node)
    }

    /// Last centroid with `mean <= x`.
    ///
    /// Means compare as the tree orders them, so `-0.0` and `0.0` are the same point.
    pub fn floor(&self, x: f64) -> Option<NodeId> {
        let x = OrderedFloat(x);
        self.tree.floor_by(|c| x.cmp(&OrderedFloat(c.mean())))
    }

    /// First centroid with `mean >= x`.
    pub fn ceiling(&self, x: f64) -> Option<NodeId> {
        let x = OrderedFloat(x);
        self.tree.ceiling_by(|c| x.cmp(&OrderedFloat(c.mean())))
    }

    /// Centroids in ascending `(mean, id)` order, with their handles.
    #[inline]
    pub fn iter(&self) -> avl::Iter<'_, CentroidOrder> {
        self.tree.iter()
    }

    /// Centroids in ascending `(mean, id)` order.
    pub fn centroids(&self) -> impl DoubleEndedIterator<Item = &Centroid> + '_ {
        self.tree.iter().map(|(_, c)| c)
    }

    /// Snapshot of the ordered centroid sequence (what histogram/scale consumers read).
    pub fn to_vec(&self) -> Vec<Centroid> {
        self.centroids().cloned().collect()
    }

    /* ===========================
     * Mutation
     * =========================== */

    /// New centroid at `x` with weight `w` and a fresh id.
    pub fn add(&mut self, x: f64, w: u64) -> TdResult<NodeId> {
        ensure_finite(x, "sample value")?;
        ensure_positive_weight(w)?;
        let c = Centroid::start(x, w, self.ids.next_id(), self.options.record_samples);
        self.insert(c).map(Insertion::node)
    }

    /// Insert an existing centroid; one with the same `(mean, id)` absorbs it instead.
    ///
    /// Fails with [`TdError::WeightOverflow`] if the tree's total weight would exceed `u64::MAX`.
    pub fn insert(&mut self, centroid: Centroid) -> TdResult<Insertion> {
        let total = self.grown_total(centroid.weight())?;
        let outcome = self.tree.insert(centroid);
        self.total_weight = total;
        Ok(outcome)
    }

    /// Fold `(x, w)` into the centroid whose mean is exactly `x`, or start a new one.
    pub fn accumulate(&mut self, x: f64, w: u64) -> TdResult<NodeId> {
        ensure_finite(x, "sample value")?;
        ensure_positive_weight(w)?;
        match self.floor(x) {
            Some(node) if self.tree.get(node).is_some_and(|c| c.mean() == x) => {
                self.add_to(node, x, w)
            }
            _ => self.add(x, w),
        }
    }

    /// Add `(x, w)` into the centroid at `node` and restore order around it.
    ///
    /// Returns the handle the centroid lives at afterwards.
    pub fn add_to(&mut self, node: NodeId, x: f64, w: u64) -> TdResult<NodeId> {
        ensure_finite(x, "sample value")?;
        ensure_positive_weight(w)?;
        let total = self.grown_total(w)?;
        let mut c = self
            .tree
            .get(node)
            .cloned()
            .ok_or(TdError::InvalidArgument {
                what: "add_to a node that is not live",
            })?;
        c.add(x, w)?;
        let at = self.tree.update(node, c)?;
        self.total_weight = total;
        Ok(at)
    }

    #[inline]
    fn grown_total(&self, w: u64) -> TdResult<u64> {
        self.total_weight
            .checked_add(w)
            .ok_or(TdError::WeightOverflow {
                context: "total weight",
            })
    }

    /// Detach the centroid at `node`.
    pub fn remove(&mut self, node: NodeId) -> TdResult<Centroid> {
        let c = self.tree.remove(node)?;
        self.total_weight -= c.weight();
        Ok(c)
    }

    /// Add each value as its own unit-weight centroid. Nothing is inserted if any value is
    /// non-finite. Returns the number of centroids added.
    pub fn extend<I>(&mut self, values: I) -> TdResult<usize>
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = values.into_iter().collect();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(TdError::NonFiniteInput {
                context: "sample value",
            });
        }
        for &x in &values {
            self.add(x, 1)?;
        }
        debug_assert!(self.validate().is_ok(), "centroid tree corrupted by extend");
        Ok(values.len())
    }

    pub fn clear(&mut self) {
        self.tree.clear();
        self.total_weight = 0;
    }

    /// Tree invariants plus strict centroid order and weight bookkeeping.
    pub fn validate(&self) -> TdResult<()> {
        self.tree.validate()?;
        let mut prev: Option<&Centroid> = None;
        let mut weight = 0u64;
        for c in self.centroids() {
            if prev.is_some_and(|p| p >= c) {
                return Err(TdError::Invariant {
                    what: "centroids out of (mean, id) order",
                });
            }
            weight += c.weight();
            prev = Some(c);
        }
        if weight != self.total_weight {
            return Err(TdError::Invariant {
                what: "total weight differs from sum of centroid weights",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tdigest::test_helpers::{assert_exact, assert_tree_consistent};

    fn means(t: &CentroidTree) -> Vec<f64> {
        t.centroids().map(|c| c.mean()).collect()
    }

    #[test]
    fn add_keeps_mean_order() {
        let mut t = CentroidTree::new();
        for x in [5.0, 3.0, 8.0, 1.0, 4.0] {
            t.add(x, 1).unwrap();
        }
        assert_eq!(means(&t), vec![1.0, 3.0, 4.0, 5.0, 8.0]);
        assert_eq!(t.len(), 5);
        assert_eq!(t.total_weight(), 5);
        assert_tree_consistent("five", &t);

        let first = t.first().unwrap();
        let last = t.last().unwrap();
        assert_exact("first", 1.0, t.get(first).unwrap().mean());
        assert_exact("last", 8.0, t.get(last).unwrap().mean());
    }

    #[test]
    fn equal_means_stay_distinct() {
        let mut t = CentroidTree::new();
        let a = t.add(2.0, 1).unwrap();
        let b = t.add(2.0, 1).unwrap();
        assert_ne!(a, b);
        assert_eq!(t.len(), 2);
        // tie broken by id: the earlier centroid comes first
        assert_eq!(t.first(), Some(a));
        assert_eq!(t.next(a), Some(b));
        assert_tree_consistent("ties", &t);
    }

    #[test]
    fn reinserting_same_centroid_merges() {
        let ids = CentroidIds::new();
        let mut t = CentroidTree::builder().ids(ids.clone()).build();
        let c = Centroid::new(1.5, 2, &ids);
        let first = t.insert(c.clone()).unwrap();
        assert!(first.is_created());
        let again = t.insert(c).unwrap();
        assert_eq!(again, Insertion::Merged(first.node()));
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(first.node()).unwrap().weight(), 4);
        assert_eq!(t.total_weight(), 4);
        assert_tree_consistent("merge", &t);
    }

    #[test]
    fn accumulate_piles_identical_values() {
        let mut t = CentroidTree::new();
        for x in [1.0, 2.0, 1.0, 3.0, 1.0, 2.0] {
            t.accumulate(x, 1).unwrap();
        }
        assert_eq!(means(&t), vec![1.0, 2.0, 3.0]);
        let weights: Vec<u64> = t.centroids().map(|c| c.weight()).collect();
        assert_eq!(weights, vec![3, 2, 1]);
        assert_tree_consistent("piles", &t);
    }

    #[test]
    fn add_to_moves_centroid_when_mean_crosses_neighbour() {
        let mut t = CentroidTree::new();
        let a = t.add(1.0, 1).unwrap();
        t.add(2.0, 1).unwrap();
        t.add(3.0, 1).unwrap();

        // mean of a stays below 2.0: in place
        let at = t.add_to(a, 1.5, 1).unwrap();
        assert_eq!(at, a);
        assert_exact("in place", 1.25, t.get(a).unwrap().mean());
        assert_eq!(means(&t), vec![1.25, 2.0, 3.0]);

        // pull it past both neighbours
        let at = t.add_to(a, 10.0, 2).unwrap();
        let c = t.get(at).unwrap();
        assert_exact("moved", (1.0 + 1.5 + 20.0) / 4.0, c.mean());
        assert_eq!(t.last(), Some(at));
        assert_eq!(t.total_weight(), 6);
        assert_tree_consistent("moved", &t);
    }

    #[test]
    fn floor_and_ceiling_by_mean() {
        let mut t = CentroidTree::new();
        for x in [10.0, 20.0, 30.0] {
            t.add(x, 1).unwrap();
        }
        let mean_at = |n: Option<NodeId>| n.map(|n| t.get(n).unwrap().mean());
        assert_eq!(mean_at(t.floor(25.0)), Some(20.0));
        assert_eq!(mean_at(t.floor(20.0)), Some(20.0));
        assert_eq!(mean_at(t.floor(9.0)), None);
        assert_eq!(mean_at(t.ceiling(25.0)), Some(30.0));
        assert_eq!(mean_at(t.ceiling(30.0)), Some(30.0));
        assert_eq!(mean_at(t.ceiling(31.0)), None);
    }

    #[test]
    fn signed_zeros_are_one_point() {
        let mut t = CentroidTree::new();
        let neg_one = t.add(-1.0, 1).unwrap();
        let pos_zero = t.add(0.0, 1).unwrap();
        let neg_zero = t.add(-0.0, 1).unwrap();
        let one = t.add(1.0, 1).unwrap();
        assert_eq!(means(&t), vec![-1.0, 0.0, 0.0, 1.0]);

        // equal means tie on id, so the later -0.0 centroid sorts after 0.0
        assert_eq!(t.floor(-0.0), Some(neg_zero));
        assert_eq!(t.floor(0.0), Some(neg_zero));
        assert_eq!(t.ceiling(-0.0), Some(pos_zero));
        assert_eq!(t.ceiling(0.0), Some(pos_zero));
        assert_eq!(t.floor(-f64::MIN_POSITIVE), Some(neg_one));
        assert_eq!(t.ceiling(f64::MIN_POSITIVE), Some(one));

        let mut acc = CentroidTree::new();
        let a = acc.accumulate(0.0, 1).unwrap();
        let b = acc.accumulate(-0.0, 1).unwrap();
        assert_eq!(a, b);
        assert_eq!(acc.len(), 1);
        assert_eq!(acc.total_weight(), 2);
        assert_tree_consistent("signed zeros", &acc);
    }

    #[test]
    fn floor_and_ceiling_with_equal_means() {
        let mut t = CentroidTree::new();
        t.add(1.0, 1).unwrap();
        let a = t.add(2.0, 1).unwrap();
        let b = t.add(2.0, 1).unwrap();
        let c = t.add(2.0, 1).unwrap();
        t.add(3.0, 1).unwrap();

        assert_eq!(t.floor(2.0), Some(c));
        assert_eq!(t.ceiling(2.0), Some(a));
        assert_eq!(t.next(a), Some(b));
        assert_eq!(t.next(b), Some(c));

        // accumulate lands on the last of the equal means and keeps them ordered
        let at = t.accumulate(2.0, 5).unwrap();
        assert_eq!(at, c);
        assert_eq!(t.get(c).unwrap().weight(), 6);
        assert_eq!(t.len(), 5);
        assert_tree_consistent("equal means", &t);
    }

    #[test]
    fn weight_overflow_is_an_error() {
        let mut t = CentroidTree::new();
        let a = t.add(1.0, u64::MAX).unwrap();
        assert!(matches!(
            t.add(2.0, 1),
            Err(TdError::WeightOverflow { .. })
        ));
        assert!(matches!(
            t.accumulate(1.0, 1),
            Err(TdError::WeightOverflow { .. })
        ));
        assert!(matches!(
            t.add_to(a, 3.0, 1),
            Err(TdError::WeightOverflow { .. })
        ));
        let ids = t.ids().clone();
        assert!(matches!(
            t.insert(Centroid::new(4.0, 1, &ids)),
            Err(TdError::WeightOverflow { .. })
        ));

        assert_eq!(t.len(), 1);
        assert_eq!(t.total_weight(), u64::MAX);
        assert_exact("mean", 1.0, t.get(a).unwrap().mean());
        assert_tree_consistent("overflow", &t);

        // room frees up once the heavy centroid is gone
        t.remove(a).unwrap();
        t.add(2.0, 1).unwrap();
        assert_eq!(t.total_weight(), 1);
    }

    #[test]
    fn add_to_rejects_zero_weight_and_dead_nodes() {
        let mut t = CentroidTree::new();
        let a = t.add(1.0, 2).unwrap();
        assert!(matches!(
            t.add_to(a, 5.0, 0),
            Err(TdError::InvalidArgument { .. })
        ));
        assert!(matches!(
            t.add_to(a, f64::NAN, 1),
            Err(TdError::NonFiniteInput { .. })
        ));
        assert_exact("unchanged", 1.0, t.get(a).unwrap().mean());
        assert_eq!(t.total_weight(), 2);

        t.remove(a).unwrap();
        assert!(matches!(
            t.add_to(a, 5.0, 1),
            Err(TdError::InvalidArgument { .. })
        ));
        assert_eq!(t.total_weight(), 0);
    }

    #[test]
    fn as_tree_exposes_structure() {
        let mut t = CentroidTree::new();
        for x in [2.0, 1.0, 3.0] {
            t.add(x, 1).unwrap();
        }
        let tree = t.as_tree();
        let root = tree.root().unwrap();
        assert_exact("root", 2.0, tree.get(root).unwrap().mean());
        let left = tree.left(root).unwrap();
        let right = tree.right(root).unwrap();
        assert_exact("left", 1.0, tree.get(left).unwrap().mean());
        assert_exact("right", 3.0, tree.get(right).unwrap().mean());
        assert_eq!(tree.parent(left), Some(root));
        assert_eq!(tree.parent(root), None);
        assert_eq!(t.depth(), 2);
    }

    #[test]
    fn remove_updates_weight() {
        let mut t = CentroidTree::new();
        let a = t.add(1.0, 3).unwrap();
        t.add(2.0, 4).unwrap();
        let c = t.remove(a).unwrap();
        assert_eq!(c.weight(), 3);
        assert_eq!(t.total_weight(), 4);
        assert!(matches!(
            t.remove(a),
            Err(TdError::InvalidArgument { .. })
        ));
        assert!(matches!(
            t.remove(NodeId::NIL),
            Err(TdError::InvalidArgument { .. })
        ));
        assert_tree_consistent("removed", &t);
    }

    #[test]
    fn rejects_non_finite_and_zero_weight() {
        let mut t = CentroidTree::new();
        assert!(matches!(
            t.add(f64::NAN, 1),
            Err(TdError::NonFiniteInput { .. })
        ));
        assert!(matches!(
            t.accumulate(f64::INFINITY, 1),
            Err(TdError::NonFiniteInput { .. })
        ));
        assert!(matches!(
            t.add(1.0, 0),
            Err(TdError::InvalidArgument { .. })
        ));
        assert!(t
            .extend(vec![1.0, 2.0, f64::NEG_INFINITY])
            .is_err());
        assert!(t.is_empty(), "a rejected batch inserts nothing");
    }

    #[test]
    fn extend_and_clear() {
        let mut t = CentroidTree::builder().initial_capacity(4).build();
        let n = t.extend((0..100).map(|i| ((i * 7) % 100) as f64)).unwrap();
        assert_eq!(n, 100);
        assert_eq!(t.len(), 100);
        assert!(t.capacity() > 100);
        assert_tree_consistent("extend", &t);

        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.total_weight(), 0);
        assert_eq!(t.depth(), 0);
    }

    #[test]
    fn recording_option_keeps_samples() {
        let mut t = CentroidTree::builder().record_samples(true).build();
        let a = t.accumulate(4.0, 1).unwrap();
        t.accumulate(4.0, 1).unwrap();
        t.accumulate(6.0, 1).unwrap();
        assert_eq!(t.get(a).unwrap().samples(), Some(&[4.0, 4.0][..]));

        let plain = {
            let mut p = CentroidTree::new();
            p.add(1.0, 1).unwrap();
            p
        };
        assert!(plain.centroids().all(|c| c.samples().is_none()));
    }

    #[test]
    fn options_round_trip_through_serde() {
        let opts = TreeOptions {
            initial_capacity: 64,
            record_samples: true,
        };
        let json = serde_json::to_string(&opts).unwrap();
        let back: TreeOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, opts);

        let partial: TreeOptions = serde_json::from_str(r#"{"record_samples":true}"#).unwrap();
        assert_eq!(partial.initial_capacity, DEFAULT_CAPACITY);

        let t = CentroidTree::with_options(opts);
        assert_eq!(t.capacity(), 64);
        assert!(t.options().record_samples);
    }

    #[test]
    fn shared_id_source_across_trees() {
        let ids = CentroidIds::new();
        let mut a = CentroidTree::builder().ids(ids.clone()).build();
        let mut b = CentroidTree::builder().ids(ids).build();
        let na = a.add(1.0, 1).unwrap();
        let nb = b.add(1.0, 1).unwrap();
        assert_ne!(a.get(na).unwrap().id(), b.get(nb).unwrap().id());
    }
}

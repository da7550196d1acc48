use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, OnceLock};

use crate::{TdError, TdResult};

/// Source of centroid ids.
///
/// Clones share one atomic counter, so ids stay unique across threads that hold the same
/// source. Each digest can own its own source; [`CentroidIds::global`] is the process-wide one.
#[derive(Debug, Clone, Default)]
pub struct CentroidIds {
    last: Arc<AtomicU64>,
}

impl CentroidIds {
    /// Fresh source; the first id issued is `1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source whose first id is `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            last: Arc::new(AtomicU64::new(first.saturating_sub(1))),
        }
    }

    /// Process-wide shared source.
    pub fn global() -> &'static CentroidIds {
        static GLOBAL: OnceLock<CentroidIds> = OnceLock::new();
        GLOBAL.get_or_init(CentroidIds::new)
    }

    #[inline]
    pub fn next_id(&self) -> u64 {
        self.last.fetch_add(1, AtomicOrdering::Relaxed) + 1
    }
}

/// A centroid summarizes a cluster of stream values as a weighted running mean.
///
/// Ordering is by `mean`, then by `id`, so distinct centroids never compare equal even when
/// their means coincide. `samples` holds the raw contributing values and is only present when
/// sample recording was requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Centroid {
    mean: OrderedFloat<f64>,
    weight: u64,
    id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    samples: Option<Vec<f64>>,
}

impl PartialEq for Centroid {
    fn eq(&self, other: &Centroid) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Centroid {}

impl PartialOrd for Centroid {
    fn partial_cmp(&self, other: &Centroid) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Centroid {
    fn cmp(&self, other: &Centroid) -> Ordering {
        self.mean
            .cmp(&other.mean)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl Hash for Centroid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Centroid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Centroid{{mean={}, weight={}}}", self.mean(), self.weight)
    }
}

impl Centroid {
    /// Centroid at `x` with weight `w` and a fresh id from `ids`.
    #[inline]
    pub fn new(x: f64, w: u64, ids: &CentroidIds) -> Self {
        Self::with_id(x, w, ids.next_id())
    }

    /// Centroid with an explicit id (e.g. when re-seeding from stored state).
    #[inline]
    pub fn with_id(x: f64, w: u64, id: u64) -> Self {
        Self::start(x, w, id, false)
    }

    /// Unit-weight centroid that records its samples, starting with `x`.
    #[inline]
    pub fn recording(x: f64, id: u64) -> Self {
        Self::start(x, 1, id, true)
    }

    /// General constructor: `(x, w)` under `id`, with or without a sample list.
    pub fn start(x: f64, w: u64, id: u64, record: bool) -> Self {
        let mut c = Centroid::empty(id, record);
        c.record(x, None);
        c.fold_mean(x, w, w);
        c
    }

    /// Centroid built through the bulk-merge path; records samples iff `samples` is given.
    pub fn weighted(x: f64, w: u64, samples: Option<&[f64]>, ids: &CentroidIds) -> Self {
        let mut c = Centroid::empty(ids.next_id(), samples.is_some());
        c.record(x, samples);
        c.fold_mean(x, w, w);
        c
    }

    #[inline]
    fn empty(id: u64, record: bool) -> Self {
        Centroid {
            mean: OrderedFloat::from(0.0),
            weight: 0,
            id,
            samples: record.then(Vec::new),
        }
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean.into_inner()
    }
    #[inline]
    pub fn weight(&self) -> u64 {
        self.weight
    }
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }
    #[inline]
    pub fn samples(&self) -> Option<&[f64]> {
        self.samples.as_deref()
    }
    #[inline]
    pub fn is_recording(&self) -> bool {
        self.samples.is_some()
    }

    /// Fold `w` copies of `x` into the running mean.
    ///
    /// Uses the incremental form `mean += w * (x - mean) / (weight + w)` instead of
    /// accumulating a raw sum, so long merge chains keep their precision.
    /// Fails with [`TdError::WeightOverflow`] and leaves `self` untouched if the weight would
    /// exceed `u64::MAX`.
    #[inline]
    pub fn add(&mut self, x: f64, w: u64) -> TdResult<()> {
        let new_w = self.grown_weight(w)?;
        self.record(x, None);
        self.fold_mean(x, w, new_w);
        Ok(())
    }

    /// Bulk merge of a cluster summarized as `(x, w)`, optionally carrying its raw values.
    ///
    /// When recording, `samples` is appended (or `x` alone when `samples` is `None`).
    /// The mean follows the same weighted recurrence as [`Centroid::add`].
    pub fn add_weighted(&mut self, x: f64, w: u64, samples: Option<&[f64]>) -> TdResult<()> {
        let new_w = self.grown_weight(w)?;
        self.record(x, samples);
        self.fold_mean(x, w, new_w);
        Ok(())
    }

    /// Merge another centroid into this one; the id of `self` is kept.
    #[inline]
    pub fn merge(&mut self, other: &Centroid) -> TdResult<()> {
        self.add_weighted(other.mean(), other.weight, other.samples())
    }

    /// Append a raw value to the sample list, creating it if needed. Mean and weight are untouched.
    pub fn insert_sample(&mut self, x: f64) {
        self.samples.get_or_insert_with(Vec::new).push(x);
    }

    #[inline]
    fn grown_weight(&self, w: u64) -> TdResult<u64> {
        self.weight.checked_add(w).ok_or(TdError::WeightOverflow {
            context: "centroid weight",
        })
    }

    #[inline]
    fn record(&mut self, x: f64, samples: Option<&[f64]>) {
        if let Some(own) = self.samples.as_mut() {
            match samples {
                Some(xs) => own.extend_from_slice(xs),
                None => own.push(x),
            }
        }
    }

    #[inline]
    fn fold_mean(&mut self, x: f64, w: u64, new_w: u64) {
        if new_w == 0 {
            return;
        }
        let m0 = self.mean.into_inner();
        self.weight = new_w;
        self.mean = OrderedFloat::from(m0 + (w as f64) * (x - m0) / (new_w as f64));
    }
}

/* ===========================
 * Slice helpers
 * =========================== */

/// Non-strictly increasing by mean (allows equal means).
#[inline]
pub fn is_sorted_by_mean(cs: &[Centroid]) -> bool {
    cs.windows(2).all(|w| w[0].mean() <= w[1].mean())
}

/// Strictly increasing under the `(mean, id)` order.
#[inline]
pub fn is_sorted_strict(cs: &[Centroid]) -> bool {
    cs.windows(2).all(|w| w[0] < w[1])
}

use crate::tdigest::centroid_tree::CentroidTree;
use crate::tdigest::centroids::Centroid;

pub fn assert_exact(label: &str, expected: f64, got: f64) {
    assert!(
        expected == got,
        "{}: expected exactly {:.9}, got {:.9}",
        label,
        expected,
        got
    );
}

pub fn assert_rel_close(label: &str, expected: f64, got: f64, rtol: f64) {
    let denom = expected.abs().max(1e-300);
    let rel = ((expected - got).abs()) / denom;
    assert!(
        rel < rtol,
        "{}: expected ~= {:.9}, got {:.9}, rel_err={:.6e}, rtol={:.6e}",
        label,
        expected,
        got,
        rel,
        rtol
    );
}

pub fn assert_monotone_chain(label: &str, values: &[f64]) {
    for i in 1..values.len() {
        assert!(
            values[i] >= values[i - 1],
            "{}: non-monotone at i={}: {} < {}",
            label,
            i,
            values[i],
            values[i - 1]
        );
    }
}

/// Centroids must be strictly increasing under `(mean, id)`.
pub fn assert_strictly_ordered(label: &str, cs: &[Centroid]) {
    for i in 1..cs.len() {
        assert!(
            cs[i - 1] < cs[i],
            "{}: out of order at i={}: {} (id {}) !< {} (id {})",
            label,
            i,
            cs[i - 1],
            cs[i - 1].id(),
            cs[i],
            cs[i].id()
        );
    }
}

/// Structural invariants, centroid order and weight bookkeeping of a whole tree.
pub fn assert_tree_consistent(label: &str, tree: &CentroidTree) {
    if let Err(e) = tree.validate() {
        panic!("{}: {}", label, e);
    }
    let cs = tree.to_vec();
    assert_eq!(cs.len(), tree.len(), "{}: iterated length", label);
    assert_strictly_ordered(label, &cs);
    let means: Vec<f64> = cs.iter().map(|c| c.mean()).collect();
    assert_monotone_chain(label, &means);
    let w: u64 = cs.iter().map(|c| c.weight()).sum();
    assert_eq!(w, tree.total_weight(), "{}: total weight", label);
}

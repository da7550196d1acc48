//! tdigest-testdata
//! Seeded value streams and tree operation scripts shared by benches and tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Available synthetic value streams.
#[derive(Clone, Copy, Debug)]
pub enum DistKind {
    /// Uniform in \[0,1)
    Uniform,
    /// Gaussian mapped to \[0,1]
    Normal,
    /// Already sorted ramp: the worst case for an unbalanced BST
    Ascending,
    /// Few distinct values repeated many times (exercises equal-mean ties and merges)
    Ties { distinct: u32 },
}

/// Generate `n` values for the chosen stream.
pub fn gen_dataset(kind: DistKind, n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(n);

    match kind {
        DistKind::Uniform => {
            for _ in 0..n {
                out.push(rng.random::<f64>());
            }
        }
        DistKind::Normal => {
            let normal = Normal::new(0.0, 1.0).unwrap();
            for _ in 0..n {
                let z: f64 = normal.sample(&mut rng);
                out.push((0.5 + 0.2 * z).clamp(0.0, 1.0));
            }
        }
        DistKind::Ascending => {
            let step = 1.0 / (n.max(1) as f64);
            for i in 0..n {
                out.push(i as f64 * step);
            }
        }
        DistKind::Ties { distinct } => {
            let distinct = distinct.max(1);
            for _ in 0..n {
                let k = rng.random_range(0..distinct);
                out.push(f64::from(k) / f64::from(distinct));
            }
        }
    }
    out
}

/// One step of a tree workload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TreeOp {
    /// Insert a value as a new centroid.
    Insert(f64),
    /// Remove the live centroid at this position (taken modulo the live count).
    RemoveAt(usize),
}

/// Mixed insert/remove script; `remove_pct` is the share of removals in \[0,100].
pub fn gen_ops(n: usize, remove_pct: u32, seed: u64) -> Vec<TreeOp> {
    let mut rng = StdRng::seed_from_u64(seed);
    let remove_pct = remove_pct.min(100);
    (0..n)
        .map(|_| {
            if rng.random_range(0..100) < remove_pct {
                TreeOp::RemoveAt(rng.random_range(0..usize::MAX))
            } else {
                TreeOp::Insert(rng.random::<f64>())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn smoke_gen() {
        for kind in [
            DistKind::Uniform,
            DistKind::Normal,
            DistKind::Ascending,
            DistKind::Ties { distinct: 8 },
        ] {
            let xs = gen_dataset(kind, 10_000, 123);
            assert_eq!(xs.len(), 10_000);
            assert!(xs.iter().all(|&x| (0.0..=1.0).contains(&x)));
        }
    }

    #[test]
    fn ties_have_few_distinct_values() {
        let mut xs = gen_dataset(DistKind::Ties { distinct: 5 }, 1_000, 7);
        xs.sort_by(|a, b| a.total_cmp(b));
        xs.dedup();
        assert!(xs.len() <= 5);
    }

    #[test]
    fn ops_are_reproducible() {
        let a = gen_ops(500, 30, 99);
        let b = gen_ops(500, 30, 99);
        assert_eq!(a, b);
        let removes = a.iter().filter(|op| matches!(op, TreeOp::RemoveAt(_))).count();
        assert!(removes > 0 && removes < 500);
    }
}

//! Sorted centroid storage for streaming quantile digests.
//!
//! - [`tdigest::IntAvlTree`]: AVL tree over integer node handles, generic over a
//!   [`tdigest::NodePolicy`] that compares, copies and merges payloads.
//! - [`tdigest::NodeAllocator`]: handle allocator with LIFO reuse of released slots.
//! - [`tdigest::Centroid`]: weighted running mean with optional retained samples.
//! - [`tdigest::CentroidTree`]: the tree specialized for centroids, ordered by `(mean, id)`.
//!
//! ```
//! use gr_digest_tree::tdigest::CentroidTree;
//!
//! let mut tree = CentroidTree::new();
//! for x in [5.0, 3.0, 8.0, 1.0, 4.0] {
//!     tree.add(x, 1).unwrap();
//! }
//! let means: Vec<f64> = tree.centroids().map(|c| c.mean()).collect();
//! assert_eq!(means, vec![1.0, 3.0, 4.0, 5.0, 8.0]);
//! ```

mod error;
pub mod tdigest;

pub use error::{TdError, TdResult};

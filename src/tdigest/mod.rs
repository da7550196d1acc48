pub mod allocator;
pub mod avl;
pub mod centroid_tree;
pub mod centroids;
pub mod test_helpers;

// Public surface
pub use allocator::{NodeAllocator, NodeId};
pub use avl::{Insertion, IntAvlTree, NodePolicy};
pub use centroid_tree::{CentroidOrder, CentroidTree, CentroidTreeBuilder, TreeOptions};
pub use centroids::{Centroid, CentroidIds};

//! Link Re-Thresholding and Tie Enrichment
//!
//! Edges are never patched in place: whenever an assignment changes they
//! are regenerated from the embeddings, the oracle and the new assignment.

mod enrich;
pub(crate) mod threshold;

pub use enrich::{enrich, TieWeights};
pub use threshold::{recompute_links, RuleIndices};

use crate::model::{Assignment, EdgeSet};

/// Drops cross-class edges, keeping those whose endpoints share a class.
pub fn same_class_only(edges: &EdgeSet, assignment: &Assignment) -> EdgeSet {
    edges.filter(|_, (u, v)| assignment.same_class(u, v))
}

//! Edge Oracle
//!
//! Adapters over the trained pairwise link model. An oracle maps a pair of
//! student embeddings to one probability per relation, in the order of the
//! configured relation list. Oracles are pure: repeated calls with the same
//! embeddings return the same probabilities.

mod embeddings;
mod mlp;

pub use embeddings::EmbeddingTable;
pub use mlp::{BatchNormWeights, DenseWeights, MlpLinkOracle, MlpWeights};

use ndarray::{ArrayView1, ArrayView2};

use crate::error::Result;

/// Trait for pairwise relation-probability models.
pub trait EdgeOracle: Send + Sync {
    /// Probability per relation for the ordered pair `(u, v)`.
    fn probabilities(&self, u: ArrayView1<'_, f32>, v: ArrayView1<'_, f32>) -> Result<Vec<f32>>;

    /// Probabilities for `source` against every row of `targets`, one vector per row.
    ///
    /// The default queries pair by pair; implementations with a vectorized
    /// forward pass should override it.
    fn probabilities_batch(&self, source: ArrayView1<'_, f32>, targets: ArrayView2<'_, f32>) -> Result<Vec<Vec<f32>>> {
        targets
            .outer_iter()
            .map(|target| self.probabilities(source, target))
            .collect()
    }
}

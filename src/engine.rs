//! Engine
//!
//! Bundles the two trained collaborators (edge oracle, wellbeing predictor)
//! with the engine configuration and runs the shared recompute chain:
//! links -> ties -> same-class features -> predicted wellbeing.

use std::sync::Arc;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{ClassforgeError, Result};
use crate::features::{compute_features, FeatureTable};
use crate::links::{enrich, recompute_links, same_class_only};
use crate::model::{Assignment, EdgeSet, Tie, Wellbeing};
use crate::oracle::{EdgeOracle, EmbeddingTable};
use crate::wellbeing::WellbeingPredictor;

/// Everything derived from one (embeddings, assignment) pair.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// All accepted edges, cross-class included.
    pub edges: EdgeSet,
    pub ties: Vec<Tie>,
    /// Features over same-class edges only.
    pub features: FeatureTable,
    pub scores: Vec<Wellbeing>,
}

pub struct Engine {
    pub oracle: Arc<dyn EdgeOracle>,
    pub predictor: Arc<dyn WellbeingPredictor>,
    pub config: EngineConfig,
}

impl Engine {
    pub fn new(oracle: Arc<dyn EdgeOracle>, predictor: Arc<dyn WellbeingPredictor>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            oracle,
            predictor,
            config,
        })
    }

    pub fn recompute_links(&self, embeddings: &EmbeddingTable, assignment: &Assignment) -> Result<EdgeSet> {
        let links = &self.config.links;
        recompute_links(
            self.oracle.as_ref(),
            embeddings,
            assignment,
            &links.relation_list,
            links.same_class_threshold,
            links.diff_class_threshold,
        )
    }

    /// Recomputes links, ties, features and predicted wellbeing under `assignment`.
    pub fn evaluate(&self, embeddings: &EmbeddingTable, assignment: &Assignment) -> Result<Evaluation> {
        if assignment.len() != embeddings.len() {
            return Err(ClassforgeError::DimensionMismatch {
                expected: embeddings.len(),
                actual: assignment.len(),
            });
        }
        let edges = self.recompute_links(embeddings, assignment)?;
        let ties = enrich(&edges, &self.config.enrichment);
        let local = same_class_only(&edges, assignment);
        let features = compute_features(&local, embeddings.len());
        let scores = self.predictor.predict(&features)?;
        debug!(
            "Evaluated {} students: {} edges ({} same-class), {} ties",
            embeddings.len(),
            edges.total_edges(),
            local.total_edges(),
            ties.len()
        );
        Ok(Evaluation {
            edges,
            ties,
            features,
            scores,
        })
    }
}

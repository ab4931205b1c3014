//! Class-aware link re-thresholding.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{ClassforgeError, Result};
use crate::model::{Assignment, EdgeSet, RelationType};
use crate::oracle::{EdgeOracle, EmbeddingTable};

/// Positions of the relations the validity rules read.
#[derive(Debug, Clone, Copy)]
pub struct RuleIndices {
    friends: usize,
    disrespect: usize,
    influential: usize,
}

impl RuleIndices {
    pub fn resolve(relation_list: &[RelationType]) -> Result<Self> {
        if let Some(dup) = first_duplicate(relation_list) {
            return Err(ClassforgeError::InvalidConfig(format!(
                "relation '{}' appears more than once in relation_list",
                dup
            )));
        }
        let find = |rel: RelationType| {
            relation_list
                .iter()
                .position(|&r| r == rel)
                .ok_or(ClassforgeError::MissingRelation(rel))
        };
        Ok(Self {
            friends: find(RelationType::Friends)?,
            disrespect: find(RelationType::Disrespect)?,
            influential: find(RelationType::Influential)?,
        })
    }
}

pub(crate) fn first_duplicate(relation_list: &[RelationType]) -> Option<RelationType> {
    relation_list
        .iter()
        .enumerate()
        .find(|(i, r)| relation_list[..*i].contains(*r))
        .map(|(_, &r)| r)
}

/// Validity rules for one pair, read from that pair's probabilities only:
/// friends and disrespect are mutually exclusive, and disrespect is only
/// credible alongside influence. A failed rule rejects every relation of the pair.
pub(crate) fn pair_is_valid(probs: &[f32], threshold: f32, idx: RuleIndices) -> bool {
    let friends = probs[idx.friends] >= threshold;
    let disrespect = probs[idx.disrespect] >= threshold;
    let influential = probs[idx.influential] >= threshold;

    if friends && disrespect {
        return false;
    }
    if disrespect && !influential {
        return false;
    }
    true
}

/// Re-derives the edge set under `assignment`.
///
/// Every ordered pair `(u, v)` with `u != v` is scored by the oracle; the
/// threshold is `same_class_threshold` when both students share a class and
/// `diff_class_threshold` otherwise. Source rows are evaluated in parallel and
/// merged in source order, so the output equals a sequential `u`-then-`v` scan.
pub fn recompute_links(
    oracle: &dyn EdgeOracle,
    embeddings: &EmbeddingTable,
    assignment: &Assignment,
    relation_list: &[RelationType],
    same_class_threshold: f32,
    diff_class_threshold: f32,
) -> Result<EdgeSet> {
    let n = embeddings.len();
    if assignment.len() != n {
        return Err(ClassforgeError::DimensionMismatch {
            expected: assignment.len(),
            actual: n,
        });
    }
    let idx = RuleIndices::resolve(relation_list)?;
    let width = relation_list.len();
    let all = embeddings.view();

    debug!("Scoring {} ordered pairs over {} relations", n * n.saturating_sub(1), width);

    let rows: Vec<Vec<(usize, usize)>> = (0..n)
        .into_par_iter()
        .map(|u| -> Result<Vec<(usize, usize)>> {
            let source = all.row(u);
            let probs = oracle.probabilities_batch(source, all)?;
            if probs.len() != n {
                return Err(ClassforgeError::DimensionMismatch { expected: n, actual: probs.len() });
            }
            let mut accepted = Vec::new();
            for (v, p) in probs.iter().enumerate() {
                if u == v {
                    continue;
                }
                if p.len() != width {
                    return Err(ClassforgeError::DimensionMismatch { expected: width, actual: p.len() });
                }
                let threshold = if assignment.same_class(u, v) {
                    same_class_threshold
                } else {
                    diff_class_threshold
                };
                if !pair_is_valid(p, threshold, idx) {
                    continue;
                }
                for (r, &prob) in p.iter().enumerate() {
                    if prob >= threshold {
                        accepted.push((v, r));
                    }
                }
            }
            Ok(accepted)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut edges = EdgeSet::with_relations(relation_list);
    for (u, accepted) in rows.into_iter().enumerate() {
        for (v, r) in accepted {
            edges.push(relation_list[r], (u, v));
        }
    }

    info!(
        "Re-thresholded links for {} students: {}",
        n,
        edges
            .relation_counts()
            .iter()
            .map(|(r, c)| format!("{}={}", r, c))
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(edges)
}

//! Tie enrichment: typed edges to signed, weighted ties.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::model::{Edge, EdgeSet, RelationType, Tie, TieLabel};

/// Per-label tie weights. Deployment-tunable; defaults are the production values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TieWeights {
    /// Friendship reported in both directions.
    pub mutual_friend: f64,
    pub oneway_friend: f64,
    pub advice: f64,
    pub feedback: f64,
    pub moretime: f64,
    pub influential: f64,
    /// Aggressor side of a disrespect edge. Strongly negative.
    pub bully: f64,
    /// Target side of a disrespect edge. Weakly positive.
    pub victim: f64,
}

impl Default for TieWeights {
    fn default() -> Self {
        Self {
            mutual_friend: 10.0,
            oneway_friend: 1.0,
            advice: 10.0,
            feedback: 10.0,
            moretime: 1.0,
            influential: 10.0,
            bully: -10.0,
            victim: 1.0,
        }
    }
}

impl TieWeights {
    pub fn weight(&self, label: TieLabel) -> f64 {
        match label {
            TieLabel::MutualFriend => self.mutual_friend,
            TieLabel::OnewayFriend => self.oneway_friend,
            TieLabel::Advice => self.advice,
            TieLabel::Feedback => self.feedback,
            TieLabel::Moretime => self.moretime,
            TieLabel::Influential => self.influential,
            TieLabel::Bully => self.bully,
            TieLabel::Victim => self.victim,
        }
    }
}

fn tie(source: usize, target: usize, label: TieLabel, weights: &TieWeights) -> Tie {
    Tie {
        source,
        target,
        label,
        weight: weights.weight(label),
    }
}

/// Converts every relation's edges into ties, relation by relation:
///
/// - friends: `mutual_friend` when the reverse edge exists (both directions
///   get the label), `oneway_friend` otherwise
/// - advice, feedback, influential, moretime: passed through
/// - disrespect `(u, v)`: `(u, v, bully)` plus `(v, u, victim)`
///
/// Self-loops and repeated edges are skipped.
pub fn enrich(edges: &EdgeSet, weights: &TieWeights) -> Vec<Tie> {
    let mut ties = Vec::with_capacity(edges.total_edges());

    for (relation, list) in edges.iter() {
        let mut seen: HashSet<Edge> = HashSet::with_capacity(list.len());
        let present: HashSet<Edge> = list.iter().copied().collect();

        for &(u, v) in list {
            if u == v || !seen.insert((u, v)) {
                continue;
            }
            match relation {
                RelationType::Friends => {
                    let label = if present.contains(&(v, u)) {
                        TieLabel::MutualFriend
                    } else {
                        TieLabel::OnewayFriend
                    };
                    ties.push(tie(u, v, label, weights));
                }
                RelationType::Advice => ties.push(tie(u, v, TieLabel::Advice, weights)),
                RelationType::Feedback => ties.push(tie(u, v, TieLabel::Feedback, weights)),
                RelationType::Moretime => ties.push(tie(u, v, TieLabel::Moretime, weights)),
                RelationType::Influential => ties.push(tie(u, v, TieLabel::Influential, weights)),
                RelationType::Disrespect => {
                    ties.push(tie(u, v, TieLabel::Bully, weights));
                    ties.push(tie(v, u, TieLabel::Victim, weights));
                }
            }
        }
    }

    ties
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge_set(relation: RelationType, edges: &[Edge]) -> EdgeSet {
        let mut set = EdgeSet::with_relations(&RelationType::ALL);
        for &e in edges {
            set.push(relation, e);
        }
        set
    }

    #[test]
    fn test_mutual_friends_both_directions() {
        let ties = enrich(&edge_set(RelationType::Friends, &[(0, 1), (1, 0), (2, 0)]), &TieWeights::default());
        assert_eq!(ties.len(), 3);
        assert_eq!(ties[0].label, TieLabel::MutualFriend);
        assert_eq!(ties[1].label, TieLabel::MutualFriend);
        assert_eq!((ties[1].source, ties[1].target), (1, 0));
        assert_eq!(ties[2].label, TieLabel::OnewayFriend);
        assert_eq!(ties[2].weight, 1.0);
    }

    #[test]
    fn test_disrespect_splits_into_bully_and_victim() {
        let ties = enrich(&edge_set(RelationType::Disrespect, &[(3, 5)]), &TieWeights::default());
        assert_eq!(ties.len(), 2);
        assert_eq!((ties[0].source, ties[0].target, ties[0].label), (3, 5, TieLabel::Bully));
        assert!(ties[0].weight < 0.0);
        assert_eq!((ties[1].source, ties[1].target, ties[1].label), (5, 3, TieLabel::Victim));
        assert!(ties[1].weight > 0.0);
    }

    #[test]
    fn test_pass_through_relations_use_configured_weights() {
        let weights = TieWeights {
            moretime: 1000.0,
            ..TieWeights::default()
        };
        let ties = enrich(&edge_set(RelationType::Moretime, &[(0, 1)]), &weights);
        assert_eq!(ties[0].label, TieLabel::Moretime);
        assert_eq!(ties[0].weight, 1000.0);
    }

    #[test]
    fn test_duplicates_are_skipped() {
        let mut set = EdgeSet::with_relations(&[RelationType::Advice]);
        set.push(RelationType::Advice, (0, 1));
        set.push(RelationType::Advice, (0, 1));
        assert_eq!(enrich(&set, &TieWeights::default()).len(), 1);
    }
}

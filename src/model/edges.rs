use serde::{Deserialize, Serialize};

use super::relation::RelationType;
use super::student::{Roster, StudentId};

/// Directed `(source, target)` pair of student indices.
pub type Edge = (usize, usize);

/// Edge lists keyed by relation, kept in the order of the configured relation list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EdgeSet {
    relations: Vec<(RelationType, Vec<Edge>)>,
}

/// Flattened edge row in student-id space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRow {
    pub source: StudentId,
    pub target: StudentId,
    pub relation: RelationType,
}

impl EdgeSet {
    pub fn with_relations(relation_list: &[RelationType]) -> Self {
        Self {
            relations: relation_list.iter().map(|&r| (r, Vec::new())).collect(),
        }
    }

    /// Appends an edge. Self-loops are dropped; unknown relations are added at the end.
    pub fn push(&mut self, relation: RelationType, edge: Edge) {
        if edge.0 == edge.1 {
            return;
        }
        match self.relations.iter_mut().find(|(r, _)| *r == relation) {
            Some((_, edges)) => edges.push(edge),
            None => self.relations.push((relation, vec![edge])),
        }
    }

    pub fn get(&self, relation: RelationType) -> &[Edge] {
        self.relations
            .iter()
            .find(|(r, _)| *r == relation)
            .map(|(_, edges)| edges.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, relation: RelationType, edge: Edge) -> bool {
        self.get(relation).contains(&edge)
    }

    pub fn relations(&self) -> impl Iterator<Item = RelationType> + '_ {
        self.relations.iter().map(|(r, _)| *r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RelationType, &[Edge])> {
        self.relations.iter().map(|(r, edges)| (*r, edges.as_slice()))
    }

    pub fn relation_counts(&self) -> Vec<(RelationType, usize)> {
        self.relations.iter().map(|(r, edges)| (*r, edges.len())).collect()
    }

    pub fn total_edges(&self) -> usize {
        self.relations.iter().map(|(_, edges)| edges.len()).sum()
    }

    /// Keeps the relation list, retaining only edges accepted by `keep`.
    pub fn filter(&self, mut keep: impl FnMut(RelationType, Edge) -> bool) -> EdgeSet {
        EdgeSet {
            relations: self
                .relations
                .iter()
                .map(|(r, edges)| (*r, edges.iter().copied().filter(|&e| keep(*r, e)).collect()))
                .collect(),
        }
    }

    /// Flattens to `(source, target, relation)` rows, relation by relation.
    pub fn to_rows(&self, roster: &Roster) -> Vec<EdgeRow> {
        self.iter()
            .flat_map(|(relation, edges)| {
                edges.iter().filter_map(move |&(u, v)| {
                    Some(EdgeRow {
                        source: roster.id(u)?.clone(),
                        target: roster.id(v)?.clone(),
                        relation,
                    })
                })
            })
            .collect()
    }
}

//! Feature Recomputation
//!
//! Rebuilds per-student network features from a (class-filtered) edge set.
//! For each relation `r` four columns are produced: `r_in_degree`,
//! `r_out_degree`, `r_closeness`, `r_betweenness`. Students absent from a
//! relation's graph get zeros.

mod graph;
mod table;

pub use graph::DiGraph;
pub use table::{FeatureTable, LabeledRow, LabeledTable};

use rayon::prelude::*;

use crate::model::{EdgeSet, RelationType};

const METRICS: [&str; 4] = ["in_degree", "out_degree", "closeness", "betweenness"];

/// Column names for `relation_list`, in table order.
pub fn feature_columns(relation_list: &[RelationType]) -> Vec<String> {
    relation_list
        .iter()
        .flat_map(|r| METRICS.iter().map(move |m| format!("{}_{}", r, m)))
        .collect()
}

/// Per-node metrics of one relation graph, keyed by student index.
struct RelationMetrics {
    students: Vec<usize>,
    values: Vec<[f64; 4]>,
}

fn relation_metrics(edges: &[(usize, usize)]) -> RelationMetrics {
    let graph = DiGraph::from_edges(edges);
    let closeness = graph.closeness();
    let betweenness = graph.betweenness();
    let n = graph.node_count();
    RelationMetrics {
        students: (0..n).map(|i| graph.student(i)).collect(),
        values: (0..n)
            .map(|i| {
                [
                    graph.in_degree(i) as f64,
                    graph.out_degree(i) as f64,
                    closeness[i],
                    betweenness[i],
                ]
            })
            .collect(),
    }
}

/// Computes the feature table for `n_students` students from `edges`.
pub fn compute_features(edges: &EdgeSet, n_students: usize) -> FeatureTable {
    let relations: Vec<(RelationType, &[(usize, usize)])> = edges.iter().collect();
    let columns = feature_columns(&relations.iter().map(|(r, _)| *r).collect::<Vec<_>>());

    let metrics: Vec<RelationMetrics> = relations.par_iter().map(|(_, list)| relation_metrics(list)).collect();

    let mut table = FeatureTable::zeros(columns, n_students);
    for (r, m) in metrics.iter().enumerate() {
        for (student, values) in m.students.iter().zip(&m.values) {
            if *student >= n_students {
                continue;
            }
            for (k, value) in values.iter().enumerate() {
                table.set(*student, r * METRICS.len() + k, *value);
            }
        }
    }
    table
}

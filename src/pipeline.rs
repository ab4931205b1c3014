//! Allocation Cycle
//!
//! One full pass of the engine: links under the current assignment, ties
//! for the optimizer, a new assignment, then links, same-class features and
//! predicted wellbeing under that new assignment. The new assignment is the
//! next cycle's input; persisting it is left to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task;
use tracing::info;
use uuid::Uuid;

use crate::engine::Engine;
use crate::error::{ClassforgeError, Result};
use crate::features::LabeledTable;
use crate::links::enrich;
use crate::model::{AssignmentRow, Cohort, EdgeRow, RelationType, TieRow, Wellbeing};
use crate::optimizer::{allocate, ObjectiveMode};
use crate::wellbeing::{class_summary, ClassSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationCycleReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub n_students: usize,
    pub n_classes: usize,
    pub objective_mode: ObjectiveMode,
    pub objective: f64,
    pub iterations: u64,
    /// Students whose class label changed.
    pub moved_students: usize,
    pub assignment_table: Vec<AssignmentRow>,
    pub edge_table: Vec<EdgeRow>,
    pub relation_counts: Vec<(RelationType, usize)>,
    pub ties: Vec<TieRow>,
    pub feature_table: LabeledTable,
    pub class_summary: Vec<ClassSummary>,
    /// Mean observed wellbeing before the cycle.
    pub mean_before: Wellbeing,
    /// Mean predicted wellbeing under the new assignment.
    pub mean_after: Wellbeing,
}

/// Runs one allocation cycle. Blocking; see [`run_cycle_blocking`].
pub fn run_cycle(engine: &Engine, cohort: &Cohort) -> Result<AllocationCycleReport> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let config = &engine.config;
    info!("Allocation cycle {} started for {} students", run_id, cohort.len());

    let current_edges = engine.recompute_links(&cohort.embeddings, &cohort.assignment)?;
    let optimizer_ties = enrich(&current_edges, config.optimizer_ties());
    let outcome = allocate(&cohort.observed, &optimizer_ties, &config.optimizer)?;

    let evaluation = engine.evaluate(&cohort.embeddings, &outcome.assignment)?;
    let roster = &cohort.roster;

    let moved_students = cohort
        .assignment
        .as_slice()
        .iter()
        .zip(outcome.assignment.as_slice())
        .filter(|(a, b)| a != b)
        .count();
    let mean_before = Wellbeing::mean(&cohort.observed);
    let mean_after = Wellbeing::mean(&evaluation.scores);

    let report = AllocationCycleReport {
        run_id,
        started_at,
        finished_at: Utc::now(),
        n_students: cohort.len(),
        n_classes: config.optimizer.n_classes,
        objective_mode: config.optimizer.objective_mode,
        objective: outcome.objective,
        iterations: outcome.iterations,
        moved_students,
        assignment_table: outcome.assignment.to_rows(roster),
        edge_table: evaluation.edges.to_rows(roster),
        relation_counts: evaluation.edges.relation_counts(),
        ties: evaluation.ties.iter().filter_map(|t| t.to_row(roster)).collect(),
        feature_table: evaluation.features.with_scores(&evaluation.scores)?.label(roster),
        class_summary: class_summary(&evaluation.scores, &outcome.assignment),
        mean_before,
        mean_after,
    };

    info!(
        "Allocation cycle {} finished: {} students moved, mean total {:.3} -> {:.3}",
        run_id,
        moved_students,
        mean_before.total(),
        mean_after.total()
    );
    Ok(report)
}

/// Runs [`run_cycle`] on tokio's blocking pool so async callers are not stalled
/// for the solver's time budget.
pub async fn run_cycle_blocking(engine: Arc<Engine>, cohort: Cohort) -> Result<AllocationCycleReport> {
    task::spawn_blocking(move || run_cycle(&engine, &cohort))
        .await
        .map_err(|e| ClassforgeError::Worker(e.to_string()))?
}

//! Reallocation Workflow
//!
//! Single-student "what-if": move one student, recompute links, ties,
//! same-class features and predicted wellbeing under the moved assignment,
//! and report the result next to the baseline. The base state is only ever
//! borrowed; every call works on its own copy of the assignment and the
//! caller decides whether to commit the returned tables.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::engine::Engine;
use crate::error::{ClassforgeError, Result};
use crate::features::LabeledTable;
use crate::model::{AssignmentRow, ClassId, Cohort, EdgeRow, StudentId, TieRow, Wellbeing};
use crate::wellbeing::{class_summary, ClassSummary};

/// Immutable base state for reallocation requests.
pub struct ReallocationState {
    engine: Arc<Engine>,
    cohort: Cohort,
    /// Predicted wellbeing under the current assignment.
    baseline: Vec<Wellbeing>,
}

/// The moved student's scores before and after the move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualScores {
    pub student_id: StudentId,
    pub previous_class: ClassId,
    pub new_class: ClassId,
    pub before: Wellbeing,
    pub after: Wellbeing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReallocationReport {
    pub class_summary: Vec<ClassSummary>,
    pub individual_scores: IndividualScores,
    /// Recomputed features with the predicted scores appended.
    pub feature_table: LabeledTable,
    pub assignment_table: Vec<AssignmentRow>,
    /// Every accepted edge under the moved assignment, cross-class included.
    pub edge_table: Vec<EdgeRow>,
    pub ties: Vec<TieRow>,
}

impl ReallocationState {
    /// Predicts the baseline scores once; later requests reuse them.
    pub fn new(engine: Arc<Engine>, cohort: Cohort) -> Result<Self> {
        let baseline = engine.evaluate(&cohort.embeddings, &cohort.assignment)?.scores;
        Ok(Self {
            engine,
            cohort,
            baseline,
        })
    }

    pub fn cohort(&self) -> &Cohort {
        &self.cohort
    }

    pub fn baseline(&self) -> &[Wellbeing] {
        &self.baseline
    }

    pub fn reallocate(&self, student_id: &StudentId, new_class: ClassId) -> Result<ReallocationReport> {
        reallocate(student_id, new_class, self)
    }
}

/// Moves `student_id` to `new_class` on a private copy of the assignment and
/// reports the consequences. Same inputs give bit-identical reports.
pub fn reallocate(student_id: &StudentId, new_class: ClassId, state: &ReallocationState) -> Result<ReallocationReport> {
    let cohort = &state.cohort;
    let idx = cohort.roster.index_of(student_id)?;
    let previous_class = cohort
        .assignment
        .class_of(idx)
        .ok_or_else(|| ClassforgeError::UnknownStudent(student_id.clone()))?;
    let before = state
        .baseline
        .get(idx)
        .copied()
        .ok_or_else(|| ClassforgeError::UnknownStudent(student_id.clone()))?;

    info!("Reallocating {} from class {} to class {}", student_id, previous_class, new_class);

    let moved = cohort.assignment.with_override(idx, new_class);
    let evaluation = state.engine.evaluate(&cohort.embeddings, &moved)?;
    let after = evaluation
        .scores
        .get(idx)
        .copied()
        .ok_or_else(|| ClassforgeError::Predictor(format!("no prediction for {}", student_id)))?;

    let feature_table = evaluation.features.with_scores(&evaluation.scores)?.label(&cohort.roster);
    let ties = evaluation
        .ties
        .iter()
        .filter_map(|t| t.to_row(&cohort.roster))
        .collect();

    let report = ReallocationReport {
        class_summary: class_summary(&evaluation.scores, &moved),
        individual_scores: IndividualScores {
            student_id: student_id.clone(),
            previous_class,
            new_class,
            before,
            after,
        },
        feature_table,
        assignment_table: moved.to_rows(&cohort.roster),
        edge_table: evaluation.edges.to_rows(&cohort.roster),
        ties,
    };

    info!(
        "Reallocated {}: total score {:.3} -> {:.3}",
        student_id,
        before.total(),
        after.total()
    );
    Ok(report)
}

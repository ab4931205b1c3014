//! Allocation Optimizer
//!
//! build-model -> solve -> extract-or-fail. The model holds one boolean per
//! (student, class), the exactly-one and class-size constraints, and the
//! wellbeing-plus-cohesion objective. Solving is seeded and bounded by a
//! wall-clock budget; a feasible but non-optimal answer is accepted.
//! Infeasibility is returned to the caller and never retried.

mod model;
mod objective;
mod solver;

pub use model::AllocationModel;
pub use objective::{ObjectiveMode, ObjectiveProfile};
pub use solver::{LocalSearchSolver, Solution, SolverSettings};

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

use crate::config::OptimizerConfig;
use crate::error::{ClassforgeError, Result};
use crate::model::{Assignment, ClassId, Tie, Wellbeing};

/// Result of one `allocate` call. Labels are `0..n_classes`, indexed like the input scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub assignment: Assignment,
    pub objective: f64,
    pub iterations: u64,
    pub elapsed_ms: u64,
}

/// Assigns every student to one of `config.n_classes` classes.
///
/// `scores[i]` is student `i`'s wellbeing triple; tie endpoints index the
/// same range. Blocking: run it on a background worker.
pub fn allocate(scores: &[Wellbeing], ties: &[Tie], config: &OptimizerConfig) -> Result<AllocationOutcome> {
    let started = Instant::now();
    let profile = ObjectiveProfile::from_config(config);
    let model = AllocationModel::build(scores, config.n_classes, ties, &profile, config.tolerance)?;
    let band = model.band();
    let infeasible = || ClassforgeError::InfeasibleAllocation {
        n_students: scores.len(),
        n_classes: config.n_classes,
        min_size: band.min_size,
        max_size: band.max_size,
    };

    info!(
        "Allocating {} students into {} classes ({} mode, sizes {}..={}, {} cohesion indicators)",
        scores.len(),
        config.n_classes,
        config.objective_mode,
        band.min_size,
        band.max_size,
        model.cohesion_indicators()
    );

    let solver = LocalSearchSolver::new(config.solver_settings());
    let solution = solver.solve(&model).ok_or_else(infeasible)?;

    let assignment = Assignment::new(solution.classes.iter().map(|&c| c as ClassId).collect());
    if !band.admits(&assignment, config.n_classes) {
        return Err(infeasible());
    }

    let elapsed_ms = started.elapsed().as_millis() as u64;
    info!(
        "Allocation finished: objective {:.3}, {} iterations, worker {}, {} ms",
        solution.objective, solution.iterations, solution.worker, elapsed_ms
    );
    Ok(AllocationOutcome {
        assignment,
        objective: solution.objective,
        iterations: solution.iterations,
        elapsed_ms,
    })
}

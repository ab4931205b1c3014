//! Error types for the allocation engine.
//!
//! Data errors (missing embeddings, shape mismatches, oracle and predictor
//! failures) abort the computation that raised them; no partial tables are
//! returned. Infeasibility is a configuration problem and is never retried.

use thiserror::Error;

use crate::model::{RelationType, StudentId};

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, ClassforgeError>;

#[derive(Error, Debug)]
pub enum ClassforgeError {
    // ========== Data Errors ==========
    /// No embedding available for a student.
    #[error("No embedding for student {0}")]
    MissingEmbedding(StudentId),

    /// Vector or table shape does not match what the consumer expects.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A relation the validity rules depend on is absent from the relation list.
    #[error("Relation '{0}' is required but missing from the relation list")]
    MissingRelation(RelationType),

    #[error("Unknown student: {0}")]
    UnknownStudent(StudentId),

    #[error("Duplicate student id: {0}")]
    DuplicateStudent(StudentId),

    /// Tie endpoint outside the student range.
    #[error("Tie {source_idx} -> {target_idx} references a student outside 0..{n_students}")]
    InvalidTie {
        source_idx: usize,
        target_idx: usize,
        n_students: usize,
    },

    #[error("Edge oracle failed: {0}")]
    Oracle(String),

    #[error("Wellbeing predictor failed: {0}")]
    Predictor(String),

    // ========== Optimization Errors ==========
    /// No assignment satisfies the class-size band.
    #[error(
        "Infeasible allocation: {n_students} students cannot fill {n_classes} classes of {min_size}..={max_size}"
    )]
    InfeasibleAllocation {
        n_students: usize,
        n_classes: usize,
        min_size: usize,
        max_size: usize,
    },

    /// Background allocation task panicked or was cancelled.
    #[error("Allocation worker failed: {0}")]
    Worker(String),

    // ========== Configuration / IO ==========
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl ClassforgeError {
    /// True for the data-error family: bad inputs or failing trained models.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            ClassforgeError::MissingEmbedding(_)
                | ClassforgeError::DimensionMismatch { .. }
                | ClassforgeError::MissingRelation(_)
                | ClassforgeError::UnknownStudent(_)
                | ClassforgeError::DuplicateStudent(_)
                | ClassforgeError::InvalidTie { .. }
                | ClassforgeError::Oracle(_)
                | ClassforgeError::Predictor(_)
        )
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, ClassforgeError::InfeasibleAllocation { .. })
    }
}

//! Data Model
//!
//! Students, relations, edges, ties and class assignments. Edges and ties
//! carry dense student indices; `Roster` maps them back to student ids.

mod assignment;
mod cohort;
mod edges;
mod relation;
mod student;
mod tie;

pub use assignment::{Assignment, AssignmentRow, ClassSizeBand};
pub use cohort::Cohort;
pub use edges::{Edge, EdgeRow, EdgeSet};
pub use relation::RelationType;
pub use student::{ClassId, Roster, ScoreDimension, Student, StudentId, Wellbeing};
pub use tie::{Tie, TieLabel, TieRow};

//! Classforge Allocation Engine
//!
//! Recommends classroom assignments from predicted social ties and
//! predicted wellbeing:
//! - Link re-thresholding over a trained edge oracle, class-aware
//! - Tie enrichment into signed, weighted ties
//! - Network features (degree, closeness, betweenness) per relation
//! - A seeded, time-bounded allocation optimizer
//! - Single-student what-if reallocation reports

pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod links;
pub mod model;
pub mod optimizer;
pub mod oracle;
pub mod pipeline;
pub mod realloc;
pub mod scenario;
pub mod utils;
pub mod wellbeing;

// Re-exports for convenience
pub use config::{EngineConfig, LinkConfig, OptimizerConfig};
pub use engine::{Engine, Evaluation};
pub use error::{ClassforgeError, Result};
pub use optimizer::{allocate, AllocationOutcome, ObjectiveMode};
pub use oracle::EdgeOracle;
pub use realloc::{reallocate, ReallocationReport, ReallocationState};
pub use wellbeing::WellbeingPredictor;

//! Scenario files for the command-line tool.
//!
//! A scenario is one JSON document naming the cohort and the exported
//! model files. Relative model paths resolve against the scenario's own
//! directory.
//!
//! ```json
//! {
//!   "oracle": "models/link_mlp.json",
//!   "predictor": "models/wellbeing_linear.json",
//!   "students": [
//!     {"id": 1001, "embedding": [0.1, 0.4], "class": 0,
//!      "wellbeing": {"academic": 71.0, "social": 64.5, "mental": 80.0}}
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::{ClassforgeError, Result};
use crate::model::{Cohort, Student};
use crate::oracle::MlpLinkOracle;
use crate::wellbeing::LinearWellbeingPredictor;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioFile {
    pub oracle: PathBuf,
    pub predictor: PathBuf,
    pub students: Vec<Student>,
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub cohort: Cohort,
    pub oracle_path: PathBuf,
    pub predictor_path: PathBuf,
}

impl Scenario {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let file: ScenarioFile = serde_json::from_str(&content)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        let cohort = Cohort::from_students(file.students)?;
        info!("Loaded scenario {:?}: {} students", path, cohort.len());
        Ok(Self {
            cohort,
            oracle_path: resolve(base, &file.oracle),
            predictor_path: resolve(base, &file.predictor),
        })
    }

    /// Loads both models and checks them against the cohort and `config`.
    pub fn build_engine(&self, config: EngineConfig) -> Result<Engine> {
        let oracle = MlpLinkOracle::load(&self.oracle_path)?;
        if oracle.output_dim() != config.links.relation_list.len() {
            return Err(ClassforgeError::Oracle(format!(
                "oracle emits {} relations but the relation list has {}",
                oracle.output_dim(),
                config.links.relation_list.len()
            )));
        }
        if !self.cohort.is_empty() && oracle.embedding_dim() != self.cohort.embeddings.dim() {
            return Err(ClassforgeError::DimensionMismatch {
                expected: oracle.embedding_dim(),
                actual: self.cohort.embeddings.dim(),
            });
        }
        let predictor = LinearWellbeingPredictor::load(&self.predictor_path)?;
        Engine::new(Arc::new(oracle), Arc::new(predictor), config)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

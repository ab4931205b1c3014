//! Engine configuration.
//!
//! One `EngineConfig` document (JSON or YAML) covers link thresholds,
//! tie weights and optimizer settings. Every section has production
//! defaults, so a partial file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::error::{ClassforgeError, Result};
use crate::links::threshold::first_duplicate;
use crate::links::TieWeights;
use crate::model::RelationType;
use crate::optimizer::{ObjectiveMode, SolverSettings};

/// Thresholds applied to oracle probabilities when re-deriving links.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LinkConfig {
    /// Relation order of the oracle output vector.
    pub relation_list: Vec<RelationType>,
    pub same_class_threshold: f32,
    pub diff_class_threshold: f32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            relation_list: RelationType::ALL.to_vec(),
            same_class_threshold: 0.53,
            diff_class_threshold: 0.69,
        }
    }
}

/// Assignment optimizer settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OptimizerConfig {
    pub n_classes: usize,
    /// Allowed fractional deviation from the uniform class size.
    pub tolerance: f64,
    pub objective_mode: ObjectiveMode,
    pub time_budget_secs: f64,
    pub seed: u64,
    /// Independent seeded searches; the best result wins.
    pub workers: usize,
    /// Iteration cap per worker. Runs that hit the cap before the time
    /// budget are reproducible bit for bit.
    pub max_iterations: u64,
    pub wellbeing_weight: f64,
    pub dominance_factor: f64,
    pub penalty_factor: f64,
    /// Multiplier on the dominant score's weight below `low_score_cutoff`.
    pub boost_factor: f64,
    pub low_score_cutoff: f64,
    /// Penalty scores above this cutoff shrink by a further factor of 100.
    pub high_score_cutoff: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            n_classes: 2,
            tolerance: 0.1,
            objective_mode: ObjectiveMode::Balanced,
            time_budget_secs: 20.0,
            seed: 42,
            workers: 1,
            max_iterations: 200_000,
            wellbeing_weight: 1.0,
            dominance_factor: 1000.0,
            penalty_factor: 100.0,
            boost_factor: 2.0,
            low_score_cutoff: 70.0,
            high_score_cutoff: 80.0,
        }
    }
}

impl OptimizerConfig {
    pub fn solver_settings(&self) -> SolverSettings {
        SolverSettings {
            time_budget: Duration::from_secs_f64(self.time_budget_secs.max(0.0)),
            seed: self.seed,
            workers: self.workers.max(1),
            max_iterations: self.max_iterations,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub links: LinkConfig,
    /// Weights used when enriching edges into ties for reports.
    pub enrichment: TieWeights,
    /// Tie weights seen by the optimizer; falls back to `enrichment`.
    pub optimizer_tie_weights: Option<TieWeights>,
    pub optimizer: OptimizerConfig,
}

impl EngineConfig {
    /// Loads a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let config: EngineConfig = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            other => {
                return Err(ClassforgeError::InvalidConfig(format!(
                    "unsupported config extension '{}' for {:?}",
                    other, path
                )))
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Applies `CLASSFORGE_*` environment overrides.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(v) = std::env::var("CLASSFORGE_N_CLASSES") {
            self.optimizer.n_classes = parse_env("CLASSFORGE_N_CLASSES", &v)?;
        }
        if let Ok(v) = std::env::var("CLASSFORGE_SEED") {
            self.optimizer.seed = parse_env("CLASSFORGE_SEED", &v)?;
        }
        if let Ok(v) = std::env::var("CLASSFORGE_TIME_BUDGET_SECS") {
            self.optimizer.time_budget_secs = parse_env("CLASSFORGE_TIME_BUDGET_SECS", &v)?;
        }
        if let Ok(v) = std::env::var("CLASSFORGE_OBJECTIVE") {
            self.optimizer.objective_mode = v.parse()?;
        }
        self.validate()
    }

    pub fn optimizer_ties(&self) -> &TieWeights {
        self.optimizer_tie_weights.as_ref().unwrap_or(&self.enrichment)
    }

    pub fn validate(&self) -> Result<()> {
        let links = &self.links;
        for (name, t) in [
            ("same_class_threshold", links.same_class_threshold),
            ("diff_class_threshold", links.diff_class_threshold),
        ] {
            if !(0.0..=1.0).contains(&t) {
                return Err(ClassforgeError::InvalidConfig(format!("{} must be in [0, 1], got {}", name, t)));
            }
        }
        if let Some(dup) = first_duplicate(&links.relation_list) {
            return Err(ClassforgeError::InvalidConfig(format!("relation '{}' is listed twice", dup)));
        }
        for required in [RelationType::Friends, RelationType::Disrespect, RelationType::Influential] {
            if !links.relation_list.contains(&required) {
                return Err(ClassforgeError::MissingRelation(required));
            }
        }
        if links.diff_class_threshold < links.same_class_threshold {
            warn!(
                "diff_class_threshold {} is below same_class_threshold {}; cross-class ties will be easier to form",
                links.diff_class_threshold, links.same_class_threshold
            );
        }

        let opt = &self.optimizer;
        if opt.n_classes == 0 {
            return Err(ClassforgeError::InvalidConfig("n_classes must be at least 1".to_string()));
        }
        if !(opt.tolerance >= 0.0) {
            return Err(ClassforgeError::InvalidConfig(format!("tolerance must be >= 0, got {}", opt.tolerance)));
        }
        if !(opt.time_budget_secs > 0.0) {
            return Err(ClassforgeError::InvalidConfig(format!(
                "time_budget_secs must be > 0, got {}",
                opt.time_budget_secs
            )));
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ClassforgeError::InvalidConfig(format!("{}: cannot parse '{}'", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_validate() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.links.relation_list.len(), 6);
        assert_eq!(config.optimizer.seed, 42);
        assert_eq!(config.optimizer_ties(), &config.enrichment);
    }

    #[test]
    fn test_load_partial_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "links:\n  same_class_threshold: 0.5\n  diff_class_threshold: 0.7\noptimizer:\n  n_classes: 4\n  objective_mode: social\n"
        )
        .unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.links.same_class_threshold, 0.5);
        assert_eq!(config.optimizer.n_classes, 4);
        assert_eq!(config.optimizer.objective_mode, ObjectiveMode::Social);
        // untouched sections keep defaults
        assert_eq!(config.optimizer.tolerance, 0.1);
        assert_eq!(config.enrichment, TieWeights::default());
    }

    #[test]
    fn test_load_json_with_optimizer_weights() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"optimizer_tie_weights": {{"bully": -70000000.0}}}}"#).unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.optimizer_ties().bully, -70_000_000.0);
        assert_eq!(config.optimizer_ties().mutual_friend, TieWeights::default().mutual_friend);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.links.same_class_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.links.relation_list = vec![RelationType::Friends, RelationType::Advice];
        assert!(matches!(config.validate(), Err(ClassforgeError::MissingRelation(_))));

        let mut config = EngineConfig::default();
        config.optimizer.n_classes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_repeated_relation() {
        let mut config = EngineConfig::default();
        config.links.relation_list.push(RelationType::Advice);
        assert!(matches!(config.validate(), Err(ClassforgeError::InvalidConfig(_))));
    }

    // Single test so the process-wide variables are not raced by other cases.
    #[test]
    fn test_env_overrides() {
        let vars = [
            "CLASSFORGE_N_CLASSES",
            "CLASSFORGE_SEED",
            "CLASSFORGE_TIME_BUDGET_SECS",
            "CLASSFORGE_OBJECTIVE",
        ];
        std::env::set_var("CLASSFORGE_N_CLASSES", "4");
        std::env::set_var("CLASSFORGE_SEED", " 7 ");
        std::env::set_var("CLASSFORGE_TIME_BUDGET_SECS", "2.5");
        std::env::set_var("CLASSFORGE_OBJECTIVE", "academic");
        let mut config = EngineConfig::default();
        let applied = config.apply_env_overrides();

        std::env::set_var("CLASSFORGE_OBJECTIVE", "happiness");
        let mut bad_mode = EngineConfig::default();
        let bad_mode_result = bad_mode.apply_env_overrides();

        std::env::remove_var("CLASSFORGE_OBJECTIVE");
        std::env::set_var("CLASSFORGE_N_CLASSES", "two");
        let mut bad_count = EngineConfig::default();
        let bad_count_result = bad_count.apply_env_overrides();

        std::env::set_var("CLASSFORGE_N_CLASSES", "0");
        let mut zero = EngineConfig::default();
        let zero_result = zero.apply_env_overrides();

        for var in vars {
            std::env::remove_var(var);
        }
        let mut untouched = EngineConfig::default();
        let untouched_result = untouched.apply_env_overrides();

        assert!(applied.is_ok());
        assert_eq!(config.optimizer.n_classes, 4);
        assert_eq!(config.optimizer.seed, 7);
        assert_eq!(config.optimizer.time_budget_secs, 2.5);
        assert_eq!(config.optimizer.objective_mode, ObjectiveMode::Academic);

        assert!(bad_mode_result.is_err());
        assert!(matches!(bad_count_result, Err(ClassforgeError::InvalidConfig(_))));
        assert!(matches!(zero_result, Err(ClassforgeError::InvalidConfig(_))));

        assert!(untouched_result.is_ok());
        assert_eq!(untouched, EngineConfig::default());
    }

    #[test]
    fn test_inverted_thresholds_are_allowed() {
        let mut config = EngineConfig::default();
        config.links.same_class_threshold = 0.8;
        config.links.diff_class_threshold = 0.4;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(EngineConfig::load(file.path()), Err(ClassforgeError::InvalidConfig(_))));
    }
}

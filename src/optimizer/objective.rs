use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::OptimizerConfig;
use crate::error::ClassforgeError;
use crate::model::{ScoreDimension, Wellbeing};

/// Dominance profile of the wellbeing term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveMode {
    /// Sum of all three scores.
    #[default]
    Balanced,
    Academic,
    Social,
    Mental,
}

impl ObjectiveMode {
    pub fn dominant(&self) -> Option<ScoreDimension> {
        match self {
            ObjectiveMode::Balanced => None,
            ObjectiveMode::Academic => Some(ScoreDimension::Academic),
            ObjectiveMode::Social => Some(ScoreDimension::Social),
            ObjectiveMode::Mental => Some(ScoreDimension::Mental),
        }
    }
}

impl fmt::Display for ObjectiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ObjectiveMode::Balanced => "balanced",
            ObjectiveMode::Academic => "academic",
            ObjectiveMode::Social => "social",
            ObjectiveMode::Mental => "mental",
        };
        f.write_str(s)
    }
}

impl FromStr for ObjectiveMode {
    type Err = ClassforgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "balanced" => Ok(ObjectiveMode::Balanced),
            "academic" => Ok(ObjectiveMode::Academic),
            "social" => Ok(ObjectiveMode::Social),
            "mental" => Ok(ObjectiveMode::Mental),
            other => Err(ClassforgeError::InvalidConfig(format!("unknown objective mode '{}'", other))),
        }
    }
}

/// One parameterised wellbeing objective covering all four modes.
///
/// Balanced mode weighs every score by `wellbeing_weight * 100`. A dominant
/// mode weighs its score by `wellbeing_weight * dominance_factor * 1000`
/// (times `boost_factor` below `low_score_cutoff`) and subtracts the other two
/// scores at `0.005 * penalty_factor`, shrunk by 100x above `high_score_cutoff`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveProfile {
    pub mode: ObjectiveMode,
    pub wellbeing_weight: f64,
    pub dominance_factor: f64,
    pub penalty_factor: f64,
    pub boost_factor: f64,
    pub low_score_cutoff: f64,
    pub high_score_cutoff: f64,
}

impl ObjectiveProfile {
    pub fn from_config(config: &OptimizerConfig) -> Self {
        Self {
            mode: config.objective_mode,
            wellbeing_weight: config.wellbeing_weight,
            dominance_factor: config.dominance_factor,
            penalty_factor: config.penalty_factor,
            boost_factor: config.boost_factor,
            low_score_cutoff: config.low_score_cutoff,
            high_score_cutoff: config.high_score_cutoff,
        }
    }

    /// Signed weight of dimension `dim` for a student with `scores`.
    pub fn dimension_weight(&self, dim: ScoreDimension, scores: &Wellbeing) -> f64 {
        let score = scores.get(dim);
        match self.mode.dominant() {
            None => self.wellbeing_weight * 100.0,
            Some(dominant) if dominant == dim => {
                let weight = self.wellbeing_weight * self.dominance_factor * 1000.0;
                if score < self.low_score_cutoff {
                    weight * self.boost_factor
                } else {
                    weight
                }
            }
            Some(_) => {
                let weight = 0.005 * self.penalty_factor;
                let weight = if score > self.high_score_cutoff { weight * 0.01 } else { weight };
                -weight
            }
        }
    }

    /// Objective coefficient of placing this student in a class.
    pub fn student_coefficient(&self, scores: &Wellbeing) -> f64 {
        ScoreDimension::ALL
            .iter()
            .map(|&dim| scores.get(dim) * self.dimension_weight(dim, scores))
            .sum()
    }
}

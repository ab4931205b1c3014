use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use super::WellbeingPredictor;
use crate::error::{ClassforgeError, Result};
use crate::model::Wellbeing;

/// Linear model for one score dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearHead {
    pub weights: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

impl LinearHead {
    fn apply(&self, row: &[f64]) -> f64 {
        self.intercept + self.weights.iter().zip(row).map(|(w, x)| w * x).sum::<f64>()
    }
}

/// Exported linear surrogate of the wellbeing regressor: one head per
/// dimension over a shared column list, optionally clamped to a score range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearWellbeingPredictor {
    columns: Vec<String>,
    academic: LinearHead,
    social: LinearHead,
    mental: LinearHead,
    #[serde(default)]
    clamp: Option<(f64, f64)>,
}

impl LinearWellbeingPredictor {
    pub fn new(columns: Vec<String>, academic: LinearHead, social: LinearHead, mental: LinearHead) -> Result<Self> {
        let predictor = Self {
            columns,
            academic,
            social,
            mental,
            clamp: None,
        };
        predictor.validate()?;
        Ok(predictor)
    }

    pub fn with_clamp(mut self, min: f64, max: f64) -> Self {
        self.clamp = Some((min, max));
        self
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let predictor: LinearWellbeingPredictor = serde_json::from_str(&content)?;
        predictor.validate()?;
        info!("Loaded wellbeing predictor from {:?} ({} features)", path, predictor.columns.len());
        Ok(predictor)
    }

    fn validate(&self) -> Result<()> {
        for head in [&self.academic, &self.social, &self.mental] {
            if head.weights.len() != self.columns.len() {
                return Err(ClassforgeError::DimensionMismatch {
                    expected: self.columns.len(),
                    actual: head.weights.len(),
                });
            }
        }
        Ok(())
    }

    fn bound(&self, v: f64) -> f64 {
        match self.clamp {
            Some((lo, hi)) => v.clamp(lo, hi),
            None => v,
        }
    }
}

impl WellbeingPredictor for LinearWellbeingPredictor {
    fn feature_columns(&self) -> &[String] {
        &self.columns
    }

    fn predict_row(&self, row: &[f64]) -> Result<Wellbeing> {
        if row.len() != self.columns.len() {
            return Err(ClassforgeError::DimensionMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        Ok(Wellbeing::new(
            self.bound(self.academic.apply(row)),
            self.bound(self.social.apply(row)),
            self.bound(self.mental.apply(row)),
        ))
    }
}

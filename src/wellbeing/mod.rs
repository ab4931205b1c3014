//! Wellbeing Prediction
//!
//! The trained wellbeing regressor is an external collaborator. It sees the
//! feature table only after reindexing to its training-time columns, so
//! callers never need to know which relations it was trained on.

mod linear;

pub use linear::{LinearHead, LinearWellbeingPredictor};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ClassforgeError, Result};
use crate::features::FeatureTable;
use crate::model::{Assignment, ClassId, Wellbeing};

/// Trait for feature-row to wellbeing predictors.
pub trait WellbeingPredictor: Send + Sync {
    /// Training-time feature column order.
    fn feature_columns(&self) -> &[String];

    /// Predicts one row already aligned to `feature_columns()`.
    fn predict_row(&self, row: &[f64]) -> Result<Wellbeing>;

    /// Reindexes `table` and predicts every row. Fails as a whole on the first bad row.
    fn predict(&self, table: &FeatureTable) -> Result<Vec<Wellbeing>> {
        let aligned = table.reindex(self.feature_columns());
        (0..aligned.n_rows())
            .map(|i| {
                let row = aligned
                    .row(i)
                    .ok_or_else(|| ClassforgeError::Predictor(format!("row {} missing", i)))?;
                let scores = self.predict_row(row)?;
                if !(scores.academic.is_finite() && scores.social.is_finite() && scores.mental.is_finite()) {
                    return Err(ClassforgeError::Predictor(format!("non-finite prediction for row {}", i)));
                }
                Ok(scores)
            })
            .collect()
    }
}

/// Mean scores of one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub class: ClassId,
    pub size: usize,
    pub mean: Wellbeing,
}

/// Per-class means, ordered by class label.
pub fn class_summary(scores: &[Wellbeing], assignment: &Assignment) -> Vec<ClassSummary> {
    let mut groups: BTreeMap<ClassId, Vec<&Wellbeing>> = BTreeMap::new();
    for (i, s) in scores.iter().enumerate() {
        if let Some(class) = assignment.class_of(i) {
            groups.entry(class).or_default().push(s);
        }
    }
    groups
        .into_iter()
        .map(|(class, members)| ClassSummary {
            class,
            size: members.len(),
            mean: Wellbeing::mean(members),
        })
        .collect()
}

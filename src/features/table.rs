use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ClassforgeError, Result};
use crate::model::{Roster, ScoreDimension, StudentId, Wellbeing};

/// Named numeric columns, one row per student index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

/// One table row labelled with its student id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRow {
    pub student_id: StudentId,
    pub values: Vec<f64>,
}

/// Feature table in student-id space, as handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledTable {
    pub columns: Vec<String>,
    pub rows: Vec<LabeledRow>,
}

impl FeatureTable {
    pub fn zeros(columns: Vec<String>, n_rows: usize) -> Self {
        let width = columns.len();
        Self {
            columns,
            rows: vec![vec![0.0; width]; n_rows],
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, i: usize) -> Option<&[f64]> {
        self.rows.get(i).map(|r| r.as_slice())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn value(&self, row: usize, column: &str) -> Option<f64> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| r[col])
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: f64) {
        // NaN from degenerate centralities counts as missing.
        self.rows[row][col] = if value.is_finite() { value } else { 0.0 };
    }

    /// Aligns the table to `expected`: missing columns are zero-filled and
    /// columns not in `expected` are dropped.
    pub fn reindex(&self, expected: &[String]) -> FeatureTable {
        let lookup: HashMap<&str, usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();
        let sources: Vec<Option<usize>> = expected.iter().map(|c| lookup.get(c.as_str()).copied()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| sources.iter().map(|s| s.map(|i| row[i]).unwrap_or(0.0)).collect())
            .collect();
        FeatureTable {
            columns: expected.to_vec(),
            rows,
        }
    }

    /// Appends `academic_score`, `social_score` and `mental_score` columns.
    pub fn with_scores(&self, scores: &[Wellbeing]) -> Result<FeatureTable> {
        if scores.len() != self.rows.len() {
            return Err(ClassforgeError::DimensionMismatch {
                expected: self.rows.len(),
                actual: scores.len(),
            });
        }
        let mut columns = self.columns.clone();
        columns.extend(ScoreDimension::ALL.iter().map(|d| d.column_name().to_string()));
        let rows = self
            .rows
            .iter()
            .zip(scores)
            .map(|(row, s)| {
                let mut row = row.clone();
                row.extend(ScoreDimension::ALL.iter().map(|&d| s.get(d)));
                row
            })
            .collect();
        Ok(FeatureTable { columns, rows })
    }

    pub fn label(&self, roster: &Roster) -> LabeledTable {
        LabeledTable {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .enumerate()
                .filter_map(|(i, values)| {
                    Some(LabeledRow {
                        student_id: roster.id(i)?.clone(),
                        values: values.clone(),
                    })
                })
                .collect(),
        }
    }
}

use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::error::{ClassforgeError, Result};
use crate::model::{Roster, StudentId};

/// Dense `n_students x dim` embedding matrix, row `i` belonging to student index `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingTable {
    matrix: Array2<f32>,
}

impl EmbeddingTable {
    pub fn new(matrix: Array2<f32>) -> Self {
        Self { matrix }
    }

    /// Builds the table from per-student vectors, which must all share one length.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let n = rows.len();
        let dim = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut flat = Vec::with_capacity(n * dim);
        for row in rows {
            if row.len() != dim {
                return Err(ClassforgeError::DimensionMismatch {
                    expected: dim,
                    actual: row.len(),
                });
            }
            flat.extend(row);
        }
        let matrix = Array2::from_shape_vec((n, dim), flat)
            .map_err(|e| ClassforgeError::Oracle(format!("embedding matrix: {}", e)))?;
        Ok(Self { matrix })
    }

    pub fn len(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.nrows() == 0
    }

    pub fn dim(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn row(&self, idx: usize) -> Option<ArrayView1<'_, f32>> {
        (idx < self.matrix.nrows()).then(|| self.matrix.row(idx))
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.matrix.view()
    }

    /// Embedding provider lookup by student id.
    pub fn embedding_for(&self, roster: &Roster, id: &StudentId) -> Result<ArrayView1<'_, f32>> {
        let idx = roster.index_of(id)?;
        self.row(idx)
            .ok_or_else(|| ClassforgeError::MissingEmbedding(id.clone()))
    }
}

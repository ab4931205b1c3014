use crate::error::{ClassforgeError, Result};
use crate::oracle::EmbeddingTable;

use super::assignment::Assignment;
use super::student::{Roster, Student, Wellbeing};

/// A year group as loaded from upstream: ids, embeddings, the current
/// assignment and the observed wellbeing scores, all aligned by index.
#[derive(Debug, Clone)]
pub struct Cohort {
    pub roster: Roster,
    pub embeddings: EmbeddingTable,
    pub assignment: Assignment,
    pub observed: Vec<Wellbeing>,
}

impl Cohort {
    pub fn from_students(students: Vec<Student>) -> Result<Self> {
        let mut ids = Vec::with_capacity(students.len());
        let mut rows = Vec::with_capacity(students.len());
        let mut classes = Vec::with_capacity(students.len());
        let mut observed = Vec::with_capacity(students.len());

        for student in students {
            if student.embedding.is_empty() {
                return Err(ClassforgeError::MissingEmbedding(student.id));
            }
            ids.push(student.id);
            rows.push(student.embedding);
            classes.push(student.class);
            observed.push(student.wellbeing);
        }

        Ok(Self {
            roster: Roster::new(ids)?,
            embeddings: EmbeddingTable::from_rows(rows)?,
            assignment: Assignment::new(classes),
            observed,
        })
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }
}

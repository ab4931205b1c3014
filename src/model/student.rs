use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{ClassforgeError, Result};

/// Class label. Labels produced by the optimizer are `0..n_classes`.
pub type ClassId = u32;

/// Opaque student identifier. Accepts numeric or string ids on input and
/// always serializes as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawStudentId", into = "String")]
pub struct StudentId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStudentId {
    Number(u64),
    Text(String),
}

impl From<RawStudentId> for StudentId {
    fn from(raw: RawStudentId) -> Self {
        match raw {
            RawStudentId::Number(n) => StudentId(n.to_string()),
            RawStudentId::Text(s) => StudentId(s),
        }
    }
}

impl From<StudentId> for String {
    fn from(id: StudentId) -> Self {
        id.0
    }
}

impl From<&str> for StudentId {
    fn from(s: &str) -> Self {
        StudentId(s.to_string())
    }
}

impl From<String> for StudentId {
    fn from(s: String) -> Self {
        StudentId(s)
    }
}

impl From<u64> for StudentId {
    fn from(n: u64) -> Self {
        StudentId(n.to_string())
    }
}

impl StudentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three wellbeing dimensions scored for every student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDimension {
    Academic,
    Social,
    Mental,
}

impl ScoreDimension {
    pub const ALL: [ScoreDimension; 3] = [ScoreDimension::Academic, ScoreDimension::Social, ScoreDimension::Mental];

    pub fn column_name(&self) -> &'static str {
        match self {
            ScoreDimension::Academic => "academic_score",
            ScoreDimension::Social => "social_score",
            ScoreDimension::Mental => "mental_score",
        }
    }
}

/// Academic, social and mental scores on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Wellbeing {
    pub academic: f64,
    pub social: f64,
    pub mental: f64,
}

impl Wellbeing {
    pub fn new(academic: f64, social: f64, mental: f64) -> Self {
        Self { academic, social, mental }
    }

    pub fn get(&self, dim: ScoreDimension) -> f64 {
        match dim {
            ScoreDimension::Academic => self.academic,
            ScoreDimension::Social => self.social,
            ScoreDimension::Mental => self.mental,
        }
    }

    pub fn total(&self) -> f64 {
        self.academic + self.social + self.mental
    }

    /// Component-wise mean. Empty input yields all zeros.
    pub fn mean<'a>(scores: impl IntoIterator<Item = &'a Wellbeing>) -> Wellbeing {
        let mut sum = Wellbeing::default();
        let mut count = 0usize;
        for s in scores {
            sum.academic += s.academic;
            sum.social += s.social;
            sum.mental += s.mental;
            count += 1;
        }
        if count == 0 {
            return sum;
        }
        let n = count as f64;
        Wellbeing::new(sum.academic / n, sum.social / n, sum.mental / n)
    }

    pub fn approx_eq(&self, other: &Wellbeing, tolerance: f64) -> bool {
        (self.academic - other.academic).abs() <= tolerance
            && (self.social - other.social).abs() <= tolerance
            && (self.mental - other.mental).abs() <= tolerance
    }
}

/// A student as supplied by the upstream loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub embedding: Vec<f32>,
    pub class: ClassId,
    #[serde(default)]
    pub wellbeing: Wellbeing,
}

/// Stable mapping between student ids and the dense indices used by the engine.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    ids: Vec<StudentId>,
    index: HashMap<StudentId, usize>,
}

impl Roster {
    pub fn new(ids: Vec<StudentId>) -> Result<Self> {
        let mut index = HashMap::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            if index.insert(id.clone(), i).is_some() {
                return Err(ClassforgeError::DuplicateStudent(id.clone()));
            }
        }
        Ok(Self { ids, index })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn index_of(&self, id: &StudentId) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| ClassforgeError::UnknownStudent(id.clone()))
    }

    pub fn id(&self, idx: usize) -> Option<&StudentId> {
        self.ids.get(idx)
    }

    pub fn ids(&self) -> &[StudentId] {
        &self.ids
    }
}

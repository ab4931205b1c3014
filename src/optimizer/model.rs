//! Assignment model: one boolean per (student, class), exactly-one and
//! class-size constraints, and a wellbeing-plus-cohesion objective.
//!
//! The cohesion term introduces, per (tie, class), the indicator
//! `assign[u][c] AND assign[v][c]` with the tie's weight as coefficient.
//! Summed over classes it equals the tie weight when `u` and `v` share a
//! class and zero otherwise, so the model stores ties merged per unordered
//! pair and evaluates the indicators implicitly from a class vector.

use std::collections::BTreeMap;

use super::objective::ObjectiveProfile;
use crate::error::{ClassforgeError, Result};
use crate::model::{ClassSizeBand, Tie, Wellbeing};

#[derive(Debug, Clone)]
pub struct AllocationModel {
    n_students: usize,
    n_classes: usize,
    band: ClassSizeBand,
    /// Row-major `n_students x n_classes` coefficients of the assignment booleans.
    unary: Vec<f64>,
    /// Merged pair weights, both directions listed.
    neighbours: Vec<Vec<(usize, f64)>>,
    cohesion_indicators: usize,
}

impl AllocationModel {
    pub fn build(
        scores: &[Wellbeing],
        n_classes: usize,
        ties: &[Tie],
        profile: &ObjectiveProfile,
        tolerance: f64,
    ) -> Result<Self> {
        if n_classes == 0 {
            return Err(ClassforgeError::InvalidConfig("n_classes must be at least 1".to_string()));
        }
        let n_students = scores.len();

        let mut unary = Vec::with_capacity(n_students * n_classes);
        for s in scores {
            let coefficient = profile.student_coefficient(s);
            unary.extend(std::iter::repeat(coefficient).take(n_classes));
        }

        let mut pairs: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for tie in ties {
            if tie.source >= n_students || tie.target >= n_students {
                return Err(ClassforgeError::InvalidTie {
                    source_idx: tie.source,
                    target_idx: tie.target,
                    n_students,
                });
            }
            if tie.source == tie.target {
                continue;
            }
            let key = (tie.source.min(tie.target), tie.source.max(tie.target));
            *pairs.entry(key).or_insert(0.0) += tie.weight;
        }

        let mut neighbours = vec![Vec::new(); n_students];
        for (&(u, v), &w) in &pairs {
            if w == 0.0 {
                continue;
            }
            neighbours[u].push((v, w));
            neighbours[v].push((u, w));
        }

        Ok(Self {
            n_students,
            n_classes,
            band: ClassSizeBand::new(n_students, n_classes, tolerance),
            unary,
            neighbours,
            cohesion_indicators: ties.len() * n_classes,
        })
    }

    pub fn n_students(&self) -> usize {
        self.n_students
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn band(&self) -> ClassSizeBand {
        self.band
    }

    /// Number of (tie, class) AND indicators the cohesion term stands for.
    pub fn cohesion_indicators(&self) -> usize {
        self.cohesion_indicators
    }

    pub(crate) fn unary(&self, student: usize, class: usize) -> f64 {
        self.unary[student * self.n_classes + class]
    }

    pub(crate) fn neighbours(&self, student: usize) -> &[(usize, f64)] {
        &self.neighbours[student]
    }

    /// Mean absolute merged pair weight; 1.0 when there are no ties.
    pub fn pair_weight_scale(&self) -> f64 {
        let (sum, count) = self
            .neighbours
            .iter()
            .flatten()
            .fold((0.0, 0usize), |(sum, count), (_, w)| (sum + w.abs(), count + 1));
        if count == 0 {
            1.0
        } else {
            sum / count as f64
        }
    }

    pub fn objective(&self, classes: &[usize]) -> f64 {
        let mut total = 0.0;
        for (s, &c) in classes.iter().enumerate() {
            total += self.unary(s, c);
            for &(t, w) in &self.neighbours[s] {
                if t > s && classes[t] == c {
                    total += w;
                }
            }
        }
        total
    }

    /// Objective change of moving `student` to class `to`.
    pub fn move_delta(&self, classes: &[usize], student: usize, to: usize) -> f64 {
        let from = classes[student];
        if from == to {
            return 0.0;
        }
        let mut delta = self.unary(student, to) - self.unary(student, from);
        for &(t, w) in &self.neighbours[student] {
            if classes[t] == to {
                delta += w;
            } else if classes[t] == from {
                delta -= w;
            }
        }
        delta
    }

    /// Objective change of exchanging the classes of `a` and `b`.
    pub fn swap_delta(&self, classes: &[usize], a: usize, b: usize) -> f64 {
        let (ca, cb) = (classes[a], classes[b]);
        if ca == cb {
            return 0.0;
        }
        let mut delta = self.unary(a, cb) - self.unary(a, ca) + self.unary(b, ca) - self.unary(b, cb);
        for &(t, w) in &self.neighbours[a] {
            if t == b {
                continue;
            }
            if classes[t] == cb {
                delta += w;
            } else if classes[t] == ca {
                delta -= w;
            }
        }
        for &(t, w) in &self.neighbours[b] {
            if t == a {
                continue;
            }
            if classes[t] == ca {
                delta += w;
            } else if classes[t] == cb {
                delta -= w;
            }
        }
        delta
    }
}

use serde::{Deserialize, Serialize};

use super::student::{ClassId, Roster, StudentId};

/// Absorbs float noise such as `10.0 * 1.1 = 11.000000000000002` before rounding.
const BAND_EPSILON: f64 = 1e-9;

/// One class label per student index. Total by construction: every index
/// below `len()` has exactly one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    classes: Vec<ClassId>,
}

impl Assignment {
    pub fn new(classes: Vec<ClassId>) -> Self {
        Self { classes }
    }

    pub fn uniform(n_students: usize, class: ClassId) -> Self {
        Self { classes: vec![class; n_students] }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn class_of(&self, student: usize) -> Option<ClassId> {
        self.classes.get(student).copied()
    }

    pub fn same_class(&self, u: usize, v: usize) -> bool {
        match (self.class_of(u), self.class_of(v)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    pub fn as_slice(&self) -> &[ClassId] {
        &self.classes
    }

    /// Copy of this assignment with one entry replaced. The receiver is left untouched.
    pub fn with_override(&self, student: usize, class: ClassId) -> Assignment {
        let mut classes = self.classes.clone();
        if let Some(slot) = classes.get_mut(student) {
            *slot = class;
        }
        Assignment { classes }
    }

    pub fn members(&self, class: ClassId) -> Vec<usize> {
        self.classes
            .iter()
            .enumerate()
            .filter(|(_, &c)| c == class)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn to_rows(&self, roster: &Roster) -> Vec<AssignmentRow> {
        self.classes
            .iter()
            .enumerate()
            .filter_map(|(i, &class)| {
                Some(AssignmentRow {
                    student_id: roster.id(i)?.clone(),
                    class,
                })
            })
            .collect()
    }

    /// Occupancy of labels `0..n_classes`. Labels outside that range are not counted.
    pub fn class_sizes(&self, n_classes: usize) -> Vec<usize> {
        let mut sizes = vec![0usize; n_classes];
        for &c in &self.classes {
            if let Some(size) = sizes.get_mut(c as usize) {
                *size += 1;
            }
        }
        sizes
    }
}

/// One assignment entry in student-id space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRow {
    pub student_id: StudentId,
    pub class: ClassId,
}

/// Allowed class occupancy around the uniform average `n_students / n_classes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSizeBand {
    pub min_size: usize,
    pub max_size: usize,
}

impl ClassSizeBand {
    /// `[floor(avg * (1 - tolerance)), ceil(avg * (1 + tolerance))]`, with the
    /// lower bound raised to 1 so that no class is left empty.
    pub fn new(n_students: usize, n_classes: usize, tolerance: f64) -> Self {
        if n_classes == 0 || n_students == 0 {
            return Self { min_size: 0, max_size: 0 };
        }
        let avg = n_students as f64 / n_classes as f64;
        let tolerance = tolerance.max(0.0);
        let lower = (avg * (1.0 - tolerance) + BAND_EPSILON).floor().max(0.0) as usize;
        let upper = (avg * (1.0 + tolerance) - BAND_EPSILON).ceil().max(0.0) as usize;
        Self {
            min_size: lower.max(1),
            max_size: upper,
        }
    }

    pub fn contains(&self, size: usize) -> bool {
        size >= self.min_size && size <= self.max_size
    }

    /// Whether any assignment of `n_students` into `n_classes` can satisfy the band.
    pub fn is_satisfiable(&self, n_students: usize, n_classes: usize) -> bool {
        if n_classes == 0 {
            return n_students == 0;
        }
        self.min_size <= self.max_size
            && n_classes * self.min_size <= n_students
            && n_students <= n_classes * self.max_size
    }

    /// Coverage and balance check for an assignment over labels `0..n_classes`.
    pub fn admits(&self, assignment: &Assignment, n_classes: usize) -> bool {
        if assignment.as_slice().iter().any(|&c| c as usize >= n_classes) {
            return false;
        }
        assignment.class_sizes(n_classes).iter().all(|&size| self.contains(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_ten_students_two_classes() {
        let band = ClassSizeBand::new(10, 2, 0.1);
        assert_eq!(band, ClassSizeBand { min_size: 4, max_size: 6 });

        let seven_three = Assignment::new(vec![0, 0, 0, 0, 0, 0, 0, 1, 1, 1]);
        assert!(!band.admits(&seven_three, 2));
        let six_four = Assignment::new(vec![0, 0, 0, 0, 0, 0, 1, 1, 1, 1]);
        assert!(band.admits(&six_four, 2));
    }

    #[test]
    fn test_band_absorbs_float_noise() {
        // avg = 10; 10 * 1.1 must not round up to 12.
        let band = ClassSizeBand::new(30, 3, 0.1);
        assert_eq!(band, ClassSizeBand { min_size: 9, max_size: 11 });
    }

    #[test]
    fn test_band_lower_bound_never_zero() {
        // floor(4 / 3 * 0.5) = 0, raised so that every class is occupied
        let band = ClassSizeBand::new(4, 3, 0.5);
        assert_eq!(band, ClassSizeBand { min_size: 1, max_size: 3 });
        assert!(!band.admits(&Assignment::new(vec![0, 0, 1, 1]), 3));
        assert!(band.admits(&Assignment::new(vec![0, 0, 1, 2]), 3));
    }

    #[test]
    fn test_band_satisfiability() {
        let band = ClassSizeBand::new(3, 5, 0.1);
        assert!(!band.is_satisfiable(3, 5));
        let band = ClassSizeBand::new(12, 3, 0.0);
        assert!(band.is_satisfiable(12, 3));
    }

    #[test]
    fn test_admits_rejects_out_of_range_labels() {
        let band = ClassSizeBand::new(4, 2, 0.5);
        assert!(!band.admits(&Assignment::new(vec![0, 0, 1, 2]), 2));
    }

    #[test]
    fn test_with_override_leaves_original() {
        let base = Assignment::new(vec![0, 1, 1]);
        let moved = base.with_override(0, 1);
        assert_eq!(base.class_of(0), Some(0));
        assert_eq!(moved.class_of(0), Some(1));
        assert_eq!(moved.members(1), vec![0, 1, 2]);
        assert!(moved.same_class(0, 2));
        assert_eq!(base.class_sizes(2), vec![1, 2]);
    }
}

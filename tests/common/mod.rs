//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use ndarray::ArrayView1;
use std::collections::HashMap;
use std::sync::Arc;

use classforge::model::{Cohort, RelationType, Student, StudentId, Wellbeing};
use classforge::oracle::EdgeOracle;
use classforge::wellbeing::{LinearHead, LinearWellbeingPredictor, WellbeingPredictor};
use classforge::{Engine, EngineConfig, Result};

/// Oracle with an explicit probability vector per ordered pair. Each
/// student's embedding is `[index]`, so the pair is read back from the
/// embeddings. Unlisted pairs score zero on every relation.
pub struct TableOracle {
    relation_list: Vec<RelationType>,
    probs: HashMap<(usize, usize), Vec<f32>>,
}

impl TableOracle {
    pub fn new() -> Self {
        Self {
            relation_list: RelationType::ALL.to_vec(),
            probs: HashMap::new(),
        }
    }

    pub fn with(mut self, u: usize, v: usize, entries: &[(RelationType, f32)]) -> Self {
        let width = self.relation_list.len();
        let row = self.probs.entry((u, v)).or_insert_with(|| vec![0.0; width]);
        for (relation, p) in entries {
            let r = self.relation_list.iter().position(|x| x == relation).unwrap();
            row[r] = *p;
        }
        self
    }
}

impl EdgeOracle for TableOracle {
    fn probabilities(&self, u: ArrayView1<'_, f32>, v: ArrayView1<'_, f32>) -> Result<Vec<f32>> {
        let key = (u[0] as usize, v[0] as usize);
        Ok(self
            .probs
            .get(&key)
            .cloned()
            .unwrap_or_else(|| vec![0.0; self.relation_list.len()]))
    }
}

pub fn student(i: usize, class: u32, wellbeing: Wellbeing) -> Student {
    Student {
        id: StudentId::from(format!("s{}", i)),
        embedding: vec![i as f32],
        class,
        wellbeing,
    }
}

pub fn cohort(classes: &[u32]) -> Cohort {
    let students = classes
        .iter()
        .enumerate()
        .map(|(i, &c)| student(i, c, Wellbeing::default()))
        .collect();
    Cohort::from_students(students).unwrap()
}

/// academic = 50 + 10 * friends_in_degree
/// social   = 40 + 5 * friends_out_degree
/// mental   = 70 - 10 * disrespect_in_degree
pub fn degree_predictor() -> LinearWellbeingPredictor {
    let head = |weights: &[f64], intercept: f64| LinearHead {
        weights: weights.to_vec(),
        intercept,
    };
    LinearWellbeingPredictor::new(
        vec![
            "friends_in_degree".to_string(),
            "friends_out_degree".to_string(),
            "disrespect_in_degree".to_string(),
        ],
        head(&[10.0, 0.0, 0.0], 50.0),
        head(&[0.0, 5.0, 0.0], 40.0),
        head(&[0.0, 0.0, -10.0], 70.0),
    )
    .unwrap()
}

pub fn test_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.optimizer.max_iterations = 2_000;
    config
}

pub fn engine(oracle: TableOracle, predictor: impl WellbeingPredictor + 'static, config: EngineConfig) -> Arc<Engine> {
    Arc::new(Engine::new(Arc::new(oracle), Arc::new(predictor), config).unwrap())
}

/// Six students in two classes of three:
/// - friends 0 <-> 1 (mutual), 1 -> 2 at 0.6, 3 <-> 4 (mutual)
/// - friends 5 -> 0 at 0.8 across classes
/// - disrespect 2 -> 3 across classes, backed by influence
pub fn school_oracle() -> TableOracle {
    use RelationType::*;
    TableOracle::new()
        .with(0, 1, &[(Friends, 0.9)])
        .with(1, 0, &[(Friends, 0.9)])
        .with(1, 2, &[(Friends, 0.6)])
        .with(3, 4, &[(Friends, 0.9)])
        .with(4, 3, &[(Friends, 0.9)])
        .with(5, 0, &[(Friends, 0.8)])
        .with(2, 3, &[(Disrespect, 0.9), (Influential, 0.9)])
}

pub fn school_classes() -> Vec<u32> {
    vec![0, 0, 0, 1, 1, 1]
}

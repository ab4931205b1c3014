//! Full allocation cycle, synchronous and on the blocking pool.

mod common;

use classforge::links::TieWeights;
use classforge::model::{ClassSizeBand, Wellbeing};
use classforge::pipeline::{run_cycle, run_cycle_blocking};
use classforge::ObjectiveMode;
use common::{cohort, degree_predictor, engine, school_classes, school_oracle, test_config};

#[tokio::test]
async fn test_cycle_on_blocking_pool() {
    let engine = engine(school_oracle(), degree_predictor(), test_config());
    let report = run_cycle_blocking(engine, cohort(&school_classes())).await.unwrap();

    assert_eq!(report.n_students, 6);
    assert_eq!(report.assignment_table.len(), 6);
    let ids: Vec<&str> = report.assignment_table.iter().map(|r| r.student_id.as_str()).collect();
    assert_eq!(ids, vec!["s0", "s1", "s2", "s3", "s4", "s5"]);

    let band = ClassSizeBand::new(6, 2, 0.1);
    let sizes: Vec<usize> = report.class_summary.iter().map(|c| c.size).collect();
    assert!(sizes.iter().all(|&s| band.contains(s)), "{:?}", sizes);
    assert_eq!(sizes.iter().sum::<usize>(), 6);

    assert_eq!(report.feature_table.rows.len(), 6);
    assert_eq!(report.objective_mode, ObjectiveMode::Balanced);
    assert!(report.finished_at >= report.started_at);
}

#[test]
fn test_cycle_keeps_friends_together_and_bully_apart() {
    // influence on 2 -> 3 would otherwise offset the bully penalty
    let mut config = test_config();
    config.optimizer_tie_weights = Some(TieWeights {
        influential: 0.0,
        ..TieWeights::default()
    });
    let engine = engine(school_oracle(), degree_predictor(), config);
    let report = run_cycle(&engine, &cohort(&school_classes())).unwrap();

    let class_of = |id: &str| {
        report
            .assignment_table
            .iter()
            .find(|r| r.student_id.as_str() == id)
            .map(|r| r.class)
            .unwrap()
    };
    assert_eq!(class_of("s0"), class_of("s1"));
    assert_eq!(class_of("s3"), class_of("s4"));
    assert_ne!(class_of("s2"), class_of("s3"));
    assert_eq!(class_of("s5"), class_of("s0"));

    // observed wellbeing defaults to zero
    assert_eq!(report.mean_before, Wellbeing::default());
    assert!(report.mean_after.academic >= 50.0);
}

#[test]
fn test_cycle_reports_are_serializable() {
    let mut config = test_config();
    config.optimizer.objective_mode = ObjectiveMode::Mental;
    let engine = engine(school_oracle(), degree_predictor(), config);
    let report = run_cycle(&engine, &cohort(&school_classes())).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["objective_mode"], "mental");
    assert!(json["run_id"].is_string());
    assert_eq!(json["relation_counts"].as_array().unwrap().len(), 6);
}

#[test]
fn test_cycle_surfaces_infeasibility() {
    let mut config = test_config();
    config.optimizer.n_classes = 7;
    let engine = engine(school_oracle(), degree_predictor(), config);
    let err = run_cycle(&engine, &cohort(&school_classes())).unwrap_err();
    assert!(err.is_infeasible());
}

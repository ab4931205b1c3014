//! Allocation optimizer: coverage, balance, cohesion and determinism.

mod common;

use classforge::links::{enrich, recompute_links, TieWeights};
use classforge::model::{Assignment, ClassSizeBand, RelationType, Tie, TieLabel, Wellbeing};
use classforge::{allocate, ObjectiveMode, OptimizerConfig};
use common::{cohort, school_classes, school_oracle};
use std::time::{Duration, Instant};

fn config(n_classes: usize, tolerance: f64, mode: ObjectiveMode) -> OptimizerConfig {
    OptimizerConfig {
        n_classes,
        tolerance,
        objective_mode: mode,
        max_iterations: 3_000,
        ..OptimizerConfig::default()
    }
}

fn scores(n: usize) -> Vec<Wellbeing> {
    (0..n)
        .map(|i| Wellbeing::new(40.0 + i as f64 * 3.0, 90.0 - i as f64 * 2.0, 60.0 + (i % 5) as f64))
        .collect()
}

fn tie(source: usize, target: usize, label: TieLabel, weight: f64) -> Tie {
    Tie {
        source,
        target,
        label,
        weight,
    }
}

#[test]
fn test_every_student_placed_within_band() {
    for mode in [ObjectiveMode::Balanced, ObjectiveMode::Academic, ObjectiveMode::Social, ObjectiveMode::Mental] {
        let cfg = config(3, 0.1, mode);
        let outcome = allocate(&scores(20), &[], &cfg).unwrap();
        assert_eq!(outcome.assignment.len(), 20, "{} mode", mode);

        let band = ClassSizeBand::new(20, 3, 0.1);
        assert!(band.admits(&outcome.assignment, 3), "{} mode: {:?}", mode, outcome.assignment.class_sizes(3));
        assert!(outcome.assignment.as_slice().iter().all(|&c| c < 3));
    }
}

#[test]
fn test_ten_students_two_classes_band() {
    let outcome = allocate(&scores(10), &[], &config(2, 0.1, ObjectiveMode::Balanced)).unwrap();
    for size in outcome.assignment.class_sizes(2) {
        assert!((4..=6).contains(&size), "class of {}", size);
    }
    let seven_three = Assignment::new(vec![0, 0, 0, 0, 0, 0, 0, 1, 1, 1]);
    assert!(!ClassSizeBand::new(10, 2, 0.1).admits(&seven_three, 2));
}

#[test]
fn test_too_many_classes_is_infeasible() {
    let err = allocate(&scores(3), &[], &config(5, 0.1, ObjectiveMode::Balanced)).unwrap_err();
    assert!(err.is_infeasible());
    assert!(!err.is_data_error());
}

#[test]
fn test_ties_out_of_range_are_rejected() {
    let ties = [tie(0, 9, TieLabel::Advice, 10.0)];
    let err = allocate(&scores(4), &ties, &config(2, 0.5, ObjectiveMode::Balanced)).unwrap_err();
    assert!(err.is_data_error());
}

#[test]
fn test_cohesion_groups_friends_and_splits_bullies() {
    let ties = [
        tie(0, 1, TieLabel::MutualFriend, 10.0),
        tie(1, 0, TieLabel::MutualFriend, 10.0),
        tie(2, 3, TieLabel::MutualFriend, 10.0),
        tie(3, 2, TieLabel::MutualFriend, 10.0),
        tie(4, 5, TieLabel::MutualFriend, 10.0),
        tie(5, 4, TieLabel::MutualFriend, 10.0),
        tie(0, 2, TieLabel::Bully, -10.0),
        tie(2, 0, TieLabel::Victim, 1.0),
    ];
    let outcome = allocate(&vec![Wellbeing::default(); 6], &ties, &config(3, 0.0, ObjectiveMode::Balanced)).unwrap();
    let a = &outcome.assignment;
    assert!(a.same_class(0, 1));
    assert!(a.same_class(2, 3));
    assert!(a.same_class(4, 5));
    assert!(!a.same_class(0, 2));
    assert_eq!(outcome.objective, 60.0);
}

#[test]
fn test_fixed_seed_reproduces_assignment() {
    let c = cohort(&school_classes());
    let edges = recompute_links(&school_oracle(), &c.embeddings, &c.assignment, &RelationType::ALL, 0.53, 0.69).unwrap();
    let ties = enrich(&edges, &TieWeights::default());
    let cfg = config(2, 0.1, ObjectiveMode::Social);

    let first = allocate(&scores(6), &ties, &cfg).unwrap();
    let second = allocate(&scores(6), &ties, &cfg).unwrap();
    assert_eq!(first.assignment, second.assignment);
    assert_eq!(first.objective, second.objective);
    assert_eq!(first.iterations, second.iterations);
}

#[test]
fn test_parallel_workers_still_feasible() {
    let cfg = OptimizerConfig {
        workers: 4,
        ..config(4, 0.2, ObjectiveMode::Academic)
    };
    let ties = [
        tie(1, 2, TieLabel::Advice, 10.0),
        tie(3, 9, TieLabel::Bully, -10.0),
        tie(5, 11, TieLabel::MutualFriend, 10.0),
    ];
    let outcome = allocate(&scores(17), &ties, &cfg).unwrap();
    assert!(ClassSizeBand::new(17, 4, 0.2).admits(&outcome.assignment, 4));

    let again = allocate(&scores(17), &ties, &cfg).unwrap();
    assert_eq!(outcome.assignment, again.assignment);
    assert_eq!(outcome.objective, again.objective);
}

#[test]
fn test_time_budget_stops_uncapped_search() {
    let cfg = OptimizerConfig {
        time_budget_secs: 0.2,
        max_iterations: u64::MAX / 2,
        ..config(6, 0.1, ObjectiveMode::Balanced)
    };
    let ties: Vec<Tie> = (0..199)
        .map(|i| tie(i, i + 1, TieLabel::MutualFriend, 10.0))
        .collect();

    let started = Instant::now();
    let outcome = allocate(&scores(200), &ties, &cfg).unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed < Duration::from_secs(5), "search ran for {:?}", elapsed);
    assert!(outcome.iterations > 0);
    assert!(outcome.iterations < cfg.max_iterations);
    assert!(ClassSizeBand::new(200, 6, 0.1).admits(&outcome.assignment, 6));
}

//! Tests for the Monte Carlo runner

use std::time::Instant;

use crate::error::{EvaluationError, RunError};
use crate::expr::Model;
use crate::model::{AnalysisProgress, Distribution, ScenarioConfig, ScenarioDefinition};
use crate::simulation::{MAX_ITERATIONS, run_scenario};
use crate::statistics::ScenarioStatistics;

fn revenue() -> (Model, ScenarioConfig) {
    let model = Model::compile("volume * price * (1 - margin)", ["volume", "price", "margin"])
        .unwrap();
    let definition = ScenarioDefinition::new("Base")
        .with_input(
            "volume",
            Distribution::Normal {
                mean: 50_000.0,
                std_dev: 2_500.0,
            },
        )
        .with_input(
            "price",
            Distribution::Normal {
                mean: 25.0,
                std_dev: 1.0,
            },
        )
        .with_input("margin", 0.45);
    let scenario = ScenarioConfig::new(&definition, &model).unwrap();
    (model, scenario)
}

#[test]
fn test_sample_length_matches_iterations() {
    let (model, scenario) = revenue();
    for iterations in [1, 99, 100, 101, 2_345] {
        let progress = AnalysisProgress::new();
        let sample = run_scenario(&model, &scenario, iterations, 3, &progress).unwrap();
        assert_eq!(sample.len(), iterations);
        assert_eq!(progress.completed(), iterations);
    }
}

#[test]
fn test_iterations_out_of_range() {
    let (model, scenario) = revenue();
    let progress = AnalysisProgress::new();
    assert!(matches!(
        run_scenario(&model, &scenario, 0, 1, &progress),
        Err(RunError::Config(_))
    ));
    assert!(matches!(
        run_scenario(&model, &scenario, MAX_ITERATIONS + 1, 1, &progress),
        Err(RunError::Config(_))
    ));
}

/// Without stochastic inputs every draw is the single model evaluation
#[test]
fn test_fixed_only_scenario() {
    let model = Model::compile("a * b - 1", ["a", "b"]).unwrap();
    let definition = ScenarioDefinition::new("Flat")
        .with_input("a", 3.0)
        .with_input("b", 4.0);
    let scenario = ScenarioConfig::new(&definition, &model).unwrap();

    let sample = run_scenario(&model, &scenario, 500, 7, &AnalysisProgress::new()).unwrap();
    let stats = ScenarioStatistics::from_sample(&sample);
    assert_eq!(stats.mean, model.evaluate(&[3.0, 4.0]).unwrap());
    assert_eq!(stats.std_dev, 0.0);
    assert_eq!(stats.p5, stats.p95);
}

#[test]
fn test_same_seed_reproduces_sample() {
    let (model, scenario) = revenue();
    let first = run_scenario(&model, &scenario, 1_000, 42, &AnalysisProgress::new()).unwrap();
    let second = run_scenario(&model, &scenario, 1_000, 42, &AnalysisProgress::new()).unwrap();
    let other = run_scenario(&model, &scenario, 1_000, 43, &AnalysisProgress::new()).unwrap();
    assert_eq!(first, second);
    assert_ne!(first, other);
}

/// Batch seeding makes the output independent of the thread count
#[cfg(feature = "parallel")]
#[test]
fn test_thread_count_does_not_change_sample() {
    let (model, scenario) = revenue();
    let single = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap()
        .install(|| run_scenario(&model, &scenario, 1_050, 5, &AnalysisProgress::new()))
        .unwrap();
    let many = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .unwrap()
        .install(|| run_scenario(&model, &scenario, 1_050, 5, &AnalysisProgress::new()))
        .unwrap();
    assert_eq!(single, many);
}

/// A prefix of a longer run matches a shorter run with the same seed
#[test]
fn test_runs_share_prefix_by_batch() {
    let (model, scenario) = revenue();
    let short = run_scenario(&model, &scenario, 300, 8, &AnalysisProgress::new()).unwrap();
    let long = run_scenario(&model, &scenario, 1_000, 8, &AnalysisProgress::new()).unwrap();
    assert_eq!(short.values(), &long.values()[..300]);
}

#[test]
fn test_evaluation_failure_fails_run() {
    let model = Model::compile("log(x)", ["x"]).unwrap();
    let definition = ScenarioDefinition::new("Signed").with_input(
        "x",
        Distribution::Normal {
            mean: 0.0,
            std_dev: 1.0,
        },
    );
    let scenario = ScenarioConfig::new(&definition, &model).unwrap();

    let first = run_scenario(&model, &scenario, 5_000, 1, &AnalysisProgress::new());
    let second = run_scenario(&model, &scenario, 5_000, 1, &AnalysisProgress::new());
    match &first {
        Err(RunError::Evaluation {
            iteration,
            error: EvaluationError::DomainError { function, operand },
        }) => {
            // Half the draws are non-positive, so the first batch fails
            assert!(*iteration < 100);
            assert_eq!(*function, "log");
            assert!(*operand <= 0.0);
        }
        other => panic!("expected a domain error, got {other:?}"),
    }
    assert_eq!(first, second);
}

#[test]
fn test_cancelled_before_start() {
    let (model, scenario) = revenue();
    let progress = AnalysisProgress::new();
    progress.cancel();
    assert_eq!(
        run_scenario(&model, &scenario, 1_000, 1, &progress),
        Err(RunError::Cancelled)
    );
    assert_eq!(progress.completed(), 0);
}

#[test]
fn test_deadline_exceeded() {
    let (model, scenario) = revenue();
    let progress = AnalysisProgress::new().with_deadline(Instant::now());
    assert_eq!(
        run_scenario(&model, &scenario, 1_000, 1, &progress),
        Err(RunError::DeadlineExceeded)
    );
}

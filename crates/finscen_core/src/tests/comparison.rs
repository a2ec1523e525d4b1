//! Tests for ranking scenarios against each other

use crate::analysis::{RankedScenario, RankingMetric, ScenarioComparison};
use crate::statistics::ScenarioStatistics;

fn stats(mean: f64, std_dev: f64, p5: f64) -> ScenarioStatistics {
    ScenarioStatistics {
        count: 100,
        mean,
        median: mean,
        std_dev,
        min: p5 - 1.0,
        max: mean + 3.0 * std_dev,
        p5,
        p25: mean - std_dev,
        p50: mean,
        p75: mean + std_dev,
        p95: mean + 2.0 * std_dev,
    }
}

fn comparison() -> ScenarioComparison {
    ScenarioComparison::new(&[
        ("Base", stats(100.0, 10.0, 80.0)),
        ("Bull", stats(150.0, 50.0, 60.0)),
        ("Bear", stats(70.0, 5.0, 62.0)),
    ])
}

fn ranked(scenario: &str, value: f64) -> RankedScenario {
    RankedScenario {
        scenario: scenario.to_string(),
        value,
    }
}

#[test]
fn test_best_and_worst_by_metric() {
    let comparison = comparison();
    assert_eq!(
        comparison.best(RankingMetric::Mean),
        Some(ranked("Bull", 150.0))
    );
    assert_eq!(
        comparison.worst(RankingMetric::Mean),
        Some(ranked("Bear", 70.0))
    );
    assert_eq!(comparison.best(RankingMetric::P5), Some(ranked("Base", 80.0)));
    assert_eq!(comparison.worst(RankingMetric::P5), Some(ranked("Bull", 60.0)));
}

/// Lower dispersion ranks better
#[test]
fn test_std_dev_prefers_lower() {
    let comparison = comparison();
    assert_eq!(
        comparison.best(RankingMetric::StdDev),
        Some(ranked("Bear", 5.0))
    );
    assert_eq!(
        comparison.worst(RankingMetric::StdDev),
        Some(ranked("Bull", 50.0))
    );
}

#[test]
fn test_risk_adjusted() {
    let comparison = comparison();
    assert_eq!(comparison.risk_adjusted_ratio("Base"), Some(10.0));
    assert_eq!(comparison.risk_adjusted_ratio("Bear"), Some(14.0));
    assert_eq!(comparison.risk_adjusted_ratio("Missing"), None);
    assert_eq!(
        comparison.best(RankingMetric::RiskAdjusted),
        Some(ranked("Bear", 14.0))
    );
}

#[test]
fn test_ties_go_to_first_scenario() {
    let comparison = ScenarioComparison::new(&[
        ("First", stats(100.0, 10.0, 80.0)),
        ("Second", stats(100.0, 10.0, 80.0)),
        ("Third", stats(90.0, 10.0, 80.0)),
    ]);
    assert_eq!(comparison.best(RankingMetric::Mean).unwrap().scenario, "First");
    assert_eq!(comparison.worst(RankingMetric::P5).unwrap().scenario, "First");
    let order: Vec<String> = comparison
        .ranking(RankingMetric::Mean)
        .into_iter()
        .map(|r| r.scenario)
        .collect();
    assert_eq!(order, ["First", "Second", "Third"]);
}

#[test]
fn test_ranking_and_spread() {
    let comparison = comparison();
    let order: Vec<String> = comparison
        .ranking(RankingMetric::StdDev)
        .into_iter()
        .map(|r| r.scenario)
        .collect();
    assert_eq!(order, ["Bear", "Base", "Bull"]);
    assert_eq!(comparison.spread(RankingMetric::Mean), 80.0);
    assert_eq!(comparison.spread(RankingMetric::StdDev), 45.0);
}

#[test]
fn test_empty_comparison() {
    let comparison = ScenarioComparison::new::<&str>(&[]);
    assert!(comparison.is_empty());
    assert_eq!(comparison.best(RankingMetric::Mean), None);
    assert!(comparison.ranking(RankingMetric::Mean).is_empty());
    assert_eq!(comparison.spread(RankingMetric::Mean), 0.0);
}

#[test]
fn test_every_metric_has_a_label() {
    for metric in RankingMetric::ALL {
        assert!(!metric.label().is_empty());
        assert_eq!(
            metric.higher_is_better(),
            metric != RankingMetric::StdDev
        );
    }
}

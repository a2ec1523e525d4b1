//! Tests for outcome statistics

use crate::model::OutcomeSample;
use crate::statistics::{ScenarioStatistics, SortedSample};

fn sorted(values: &[f64]) -> SortedSample {
    SortedSample::new(values.to_vec())
}

#[test]
fn test_median_odd_and_even() {
    assert_eq!(sorted(&[3.0, 1.0, 2.0]).median(), 2.0);
    assert_eq!(sorted(&[4.0, 1.0, 3.0, 2.0]).median(), 2.5);
}

#[test]
fn test_percentile_interpolation() {
    let sample = sorted(&[5.0, 1.0, 4.0, 2.0, 3.0]);
    assert_eq!(sample.percentile(0.0), 1.0);
    assert_eq!(sample.percentile(0.25), 2.0);
    assert!((sample.percentile(0.1) - 1.4).abs() < 1e-12);
    assert_eq!(sample.percentile(1.0), 5.0);
    // Out-of-range probabilities clamp
    assert_eq!(sample.percentile(1.5), 5.0);
}

#[test]
fn test_summary_fields() {
    let values: Vec<f64> = (1..=100).map(f64::from).collect();
    let stats = ScenarioStatistics::from_sample(&OutcomeSample::new(values));
    assert_eq!(stats.count, 100);
    assert!((stats.mean - 50.5).abs() < 1e-9);
    assert_eq!(stats.median, 50.5);
    assert_eq!(stats.min, 1.0);
    assert_eq!(stats.max, 100.0);
    assert!((stats.p5 - 5.95).abs() < 1e-9);
    assert!((stats.p95 - 95.05).abs() < 1e-9);
    assert!(stats.p5 <= stats.p25 && stats.p25 <= stats.p50);
    assert!(stats.p50 <= stats.p75 && stats.p75 <= stats.p95);
    // Variance of 1..=n with n - 1 denominator is n (n + 1) / 12
    assert!((stats.std_dev - (100.0_f64 * 101.0 / 12.0).sqrt()).abs() < 1e-9);
}

#[test]
fn test_threshold_probabilities_are_strict() {
    let sample = sorted(&[1.0, 2.0, 2.0, 3.0]);
    assert_eq!(sample.probability_above(2.0), 0.25);
    assert_eq!(sample.probability_below(2.0), 0.25);
    assert_eq!(sample.probability_above(0.0), 1.0);
    assert_eq!(sample.probability_above(3.0), 0.0);
}

#[test]
fn test_probability_above_is_non_increasing() {
    let values: Vec<f64> = (0..500).map(|i| ((i * 37) % 101) as f64 - 50.0).collect();
    let sample = SortedSample::new(values);
    let mut previous = 1.0;
    for step in -60..=60 {
        let p = sample.probability_above(f64::from(step));
        assert!(p <= previous);
        previous = p;
    }
}

#[test]
fn test_tail_measures() {
    let values: Vec<f64> = (1..=100).map(f64::from).collect();
    let sample = SortedSample::new(values);
    assert_eq!(sample.expected_shortfall(0.05), 3.0);
    // At least one outcome is always in the tail
    assert_eq!(sample.expected_shortfall(0.0), 1.0);
    assert_eq!(sample.expected_shortfall(1.0), 50.5);
    assert_eq!(sample.value_at_risk(0.05), sample.percentile(0.05));
}

/// Degenerate samples give zeros, never NaN
#[test]
fn test_degenerate_samples() {
    let empty = ScenarioStatistics::from_sample(&OutcomeSample::default());
    assert_eq!(empty, ScenarioStatistics::default());
    assert_eq!(SortedSample::default().probability_above(0.0), 0.0);
    assert_eq!(SortedSample::default().expected_shortfall(0.05), 0.0);

    let single = ScenarioStatistics::from_sample(&OutcomeSample::new(vec![7.0]));
    assert_eq!(single.std_dev, 0.0);
    assert_eq!(single.p5, 7.0);
    assert_eq!(single.risk_adjusted_ratio(), 0.0);

    let flat = ScenarioStatistics::from_sample(&OutcomeSample::new(vec![2.0; 50]));
    assert_eq!(flat.std_dev, 0.0);
    assert_eq!(flat.risk_adjusted_ratio(), 0.0);
}

#[test]
fn test_risk_adjusted_ratio() {
    let stats = ScenarioStatistics::from_sample(&OutcomeSample::new(vec![1.0, 3.0]));
    // mean 2, sample std dev sqrt(2)
    assert!((stats.risk_adjusted_ratio() - 2.0 / 2.0_f64.sqrt()).abs() < 1e-12);
}

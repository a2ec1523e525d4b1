//! Tests for the request and report data contracts

use crate::analysis::run_analysis;
use crate::config::AnalysisConfig;
use crate::model::{Distribution, InputAssignment};

const REQUEST: &str = r#"{
    "inputNames": ["volume", "price", "margin"],
    "model": "volume * price * (1 - margin)",
    "iterations": 2000,
    "scenarios": [
        {
            "name": "Base",
            "inputs": {
                "volume": {"distribution": {"type": "normal", "mean": 50000, "stdDev": 2500}},
                "price": {"distribution": {"type": "triangular", "min": 20, "mode": 25, "max": 28}},
                "margin": {"value": 0.45}
            }
        },
        {
            "name": "Tails",
            "inputs": {
                "volume": {"distribution": {"type": "logNormal", "logMean": 10.8, "logStdDev": 0.1}},
                "price": {"distribution": {"type": "uniform", "min": 20, "max": 30}},
                "margin": {"distribution": {"type": "exponential", "rate": 4}}
            }
        }
    ],
    "thresholds": [500000],
    "seed": 17,
    "timeoutMs": 60000
}"#;

#[test]
fn test_request_deserializes() {
    let config: AnalysisConfig = serde_json::from_str(REQUEST).unwrap();
    assert_eq!(config.input_names, ["volume", "price", "margin"]);
    assert_eq!(config.iterations, 2_000);
    assert_eq!(config.seed, Some(17));
    assert_eq!(config.timeout_ms, Some(60_000));
    assert_eq!(config.thresholds, [500_000.0]);

    let base = config.scenario("Base").unwrap();
    assert_eq!(base.inputs["margin"], InputAssignment::Fixed(0.45));
    assert_eq!(
        base.inputs["volume"],
        InputAssignment::Sampled(Distribution::Normal {
            mean: 50_000.0,
            std_dev: 2_500.0
        })
    );
    let tails = config.scenario("Tails").unwrap();
    assert_eq!(
        tails.inputs["volume"],
        InputAssignment::Sampled(Distribution::LogNormal {
            log_mean: 10.8,
            log_std_dev: 0.1
        })
    );
    assert_eq!(
        tails.inputs["margin"],
        InputAssignment::Sampled(Distribution::Exponential { rate: 4.0 })
    );
}

#[test]
fn test_optional_fields_default() {
    let config: AnalysisConfig = serde_json::from_str(
        r#"{"inputNames": ["a"], "model": "a", "iterations": 10,
            "scenarios": [{"name": "S", "inputs": {"a": {"value": 1}}}]}"#,
    )
    .unwrap();
    assert!(config.thresholds.is_empty());
    assert_eq!(config.seed, None);
    assert_eq!(config.timeout(), None);
}

#[test]
fn test_duplicate_assignment_rejected() {
    let result: Result<AnalysisConfig, _> = serde_json::from_str(
        r#"{"inputNames": ["a"], "model": "a", "iterations": 10,
            "scenarios": [{"name": "S", "inputs": {"a": {"value": 1.0}, "a": {"value": 5.0}}}]}"#,
    );
    let message = result.unwrap_err().to_string();
    assert!(
        message.contains("input 'a' is assigned more than once"),
        "{message}"
    );
}

#[test]
fn test_unknown_distribution_rejected() {
    let result: Result<InputAssignment, _> =
        serde_json::from_str(r#"{"distribution": {"type": "cauchy", "location": 0}}"#);
    assert!(result.is_err());
}

#[test]
fn test_report_serializes_camel_case() {
    let config: AnalysisConfig = serde_json::from_str(REQUEST).unwrap();
    let report = run_analysis(config).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["seed"], 17);
    assert_eq!(json["iterations"], 2000);
    let base = &json["scenarios"][0];
    assert_eq!(base["name"], "Base");
    for key in [
        "mean",
        "median",
        "stdDev",
        "p5",
        "p25",
        "p75",
        "p95",
        "min",
        "max",
        "riskAdjustedRatio",
    ] {
        assert!(base[key].is_number(), "missing {key}");
    }
    assert!(json["comparison"]["bestByMean"]["scenario"].is_string());
    assert!(json["comparison"]["worstByP5"]["value"].is_number());
    assert!(json["thresholds"][0]["scenarios"][1]["probabilityAbove"].is_number());

    let round_trip: crate::analysis::AnalysisReport = serde_json::from_value(json).unwrap();
    assert_eq!(round_trip.scenarios.len(), 2);
}

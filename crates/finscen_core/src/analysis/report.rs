//! Read-only output of a completed scenario analysis.

use serde::{Deserialize, Serialize};

use super::comparison::{RankedScenario, RankingMetric, ScenarioComparison};
use crate::statistics::{ScenarioStatistics, SortedSample};

/// Tail fraction used for the per-scenario expected shortfall
pub const SHORTFALL_TAIL: f64 = 0.05;

/// Statistics for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub name: String,
    #[serde(flatten)]
    pub statistics: ScenarioStatistics,
    pub risk_adjusted_ratio: f64,
    /// Mean of the worst 5% of outcomes
    pub expected_shortfall: f64,
}

impl ScenarioReport {
    pub(crate) fn new(name: &str, sorted: &SortedSample) -> Self {
        let statistics = ScenarioStatistics::from_sorted(sorted);
        Self {
            name: name.to_string(),
            statistics,
            risk_adjusted_ratio: statistics.risk_adjusted_ratio(),
            expected_shortfall: sorted.expected_shortfall(SHORTFALL_TAIL),
        }
    }
}

/// Headline cross-scenario comparison
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSummary {
    pub best_by_mean: RankedScenario,
    pub worst_by_mean: RankedScenario,
    pub best_by_p5: RankedScenario,
    pub worst_by_p5: RankedScenario,
    pub best_risk_adjusted: RankedScenario,
    /// All scenarios by mean, best first
    pub ranking_by_mean: Vec<RankedScenario>,
}

impl ComparisonSummary {
    pub(crate) fn from_comparison(comparison: &ScenarioComparison) -> Self {
        let best = |metric| comparison.best(metric).unwrap_or_default();
        let worst = |metric| comparison.worst(metric).unwrap_or_default();
        Self {
            best_by_mean: best(RankingMetric::Mean),
            worst_by_mean: worst(RankingMetric::Mean),
            best_by_p5: best(RankingMetric::P5),
            worst_by_p5: worst(RankingMetric::P5),
            best_risk_adjusted: best(RankingMetric::RiskAdjusted),
            ranking_by_mean: comparison.ranking(RankingMetric::Mean),
        }
    }
}

/// Probability of one scenario's outcome relative to a threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdProbability {
    pub scenario: String,
    /// Fraction of outcomes strictly above the threshold
    pub probability_above: f64,
    pub probability_below: f64,
}

/// One row of the threshold table, scenarios in request order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdRow {
    pub threshold: f64,
    pub scenarios: Vec<ThresholdProbability>,
}

impl ThresholdRow {
    pub(crate) fn new<'a>(
        threshold: f64,
        samples: impl IntoIterator<Item = (&'a str, &'a SortedSample)>,
    ) -> Self {
        Self {
            threshold,
            scenarios: samples
                .into_iter()
                .map(|(scenario, sorted)| ThresholdProbability {
                    scenario: scenario.to_string(),
                    probability_above: sorted.probability_above(threshold),
                    probability_below: sorted.probability_below(threshold),
                })
                .collect(),
        }
    }
}

/// Result of a completed analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Analysis seed; rerunning with it reproduces this report exactly
    pub seed: u64,
    pub iterations: usize,
    /// Per-scenario statistics in request order
    pub scenarios: Vec<ScenarioReport>,
    pub comparison: ComparisonSummary,
    pub thresholds: Vec<ThresholdRow>,
}

impl AnalysisReport {
    #[must_use]
    pub fn scenario(&self, name: &str) -> Option<&ScenarioReport> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    #[must_use]
    pub fn statistics(&self, name: &str) -> Option<&ScenarioStatistics> {
        self.scenario(name).map(|s| &s.statistics)
    }

    /// Exceedance probability for a scenario at a requested threshold
    #[must_use]
    pub fn probability_above(&self, scenario: &str, threshold: f64) -> Option<f64> {
        self.thresholds
            .iter()
            .find(|row| row.threshold == threshold)?
            .scenarios
            .iter()
            .find(|p| p.scenario == scenario)
            .map(|p| p.probability_above)
    }

    /// Rebuild a comparator over the reported statistics
    #[must_use]
    pub fn comparator(&self) -> ScenarioComparison {
        let pairs: Vec<(&str, ScenarioStatistics)> = self
            .scenarios
            .iter()
            .map(|s| (s.name.as_str(), s.statistics))
            .collect();
        ScenarioComparison::new(&pairs)
    }
}

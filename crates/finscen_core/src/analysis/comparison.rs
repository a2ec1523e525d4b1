//! Cross-scenario ranking by a chosen statistic.

use serde::{Deserialize, Serialize};

use crate::statistics::ScenarioStatistics;

/// Statistic used to rank scenarios against each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RankingMetric {
    Mean,
    Median,
    /// Lower dispersion ranks better
    StdDev,
    P5,
    P25,
    P50,
    P75,
    P95,
    Min,
    Max,
    /// Mean over standard deviation
    RiskAdjusted,
}

impl RankingMetric {
    pub const ALL: [RankingMetric; 11] = [
        RankingMetric::Mean,
        RankingMetric::Median,
        RankingMetric::StdDev,
        RankingMetric::P5,
        RankingMetric::P25,
        RankingMetric::P50,
        RankingMetric::P75,
        RankingMetric::P95,
        RankingMetric::Min,
        RankingMetric::Max,
        RankingMetric::RiskAdjusted,
    ];

    #[must_use]
    pub fn value(&self, stats: &ScenarioStatistics) -> f64 {
        match self {
            Self::Mean => stats.mean,
            Self::Median => stats.median,
            Self::StdDev => stats.std_dev,
            Self::P5 => stats.p5,
            Self::P25 => stats.p25,
            Self::P50 => stats.p50,
            Self::P75 => stats.p75,
            Self::P95 => stats.p95,
            Self::Min => stats.min,
            Self::Max => stats.max,
            Self::RiskAdjusted => stats.risk_adjusted_ratio(),
        }
    }

    #[must_use]
    pub fn higher_is_better(&self) -> bool {
        !matches!(self, Self::StdDev)
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mean => "Mean",
            Self::Median => "Median",
            Self::StdDev => "Std Dev",
            Self::P5 => "P5",
            Self::P25 => "P25",
            Self::P50 => "P50",
            Self::P75 => "P75",
            Self::P95 => "P95",
            Self::Min => "Min",
            Self::Max => "Max",
            Self::RiskAdjusted => "Risk-Adjusted Ratio",
        }
    }

    /// True when `a` ranks strictly ahead of `b`
    fn beats(&self, a: f64, b: f64) -> bool {
        if self.higher_is_better() {
            a > b
        } else {
            a < b
        }
    }
}

/// A scenario's value under one ranking metric
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedScenario {
    pub scenario: String,
    pub value: f64,
}

/// Ranks named scenario statistics.
///
/// Scenarios keep the caller's order; every tie goes to the scenario that
/// came first.
#[derive(Debug, Clone, Default)]
pub struct ScenarioComparison {
    scenarios: Vec<(String, ScenarioStatistics)>,
}

impl ScenarioComparison {
    pub fn new<S: AsRef<str>>(scenarios: &[(S, ScenarioStatistics)]) -> Self {
        Self {
            scenarios: scenarios
                .iter()
                .map(|(name, stats)| (name.as_ref().to_string(), *stats))
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    #[must_use]
    pub fn statistics(&self, scenario: &str) -> Option<&ScenarioStatistics> {
        self.scenarios
            .iter()
            .find(|(name, _)| name == scenario)
            .map(|(_, stats)| stats)
    }

    fn pick(&self, metric: RankingMetric, prefer_best: bool) -> Option<RankedScenario> {
        let mut chosen: Option<(&str, f64)> = None;
        for (name, stats) in &self.scenarios {
            let value = metric.value(stats);
            let replace = match chosen {
                None => true,
                Some((_, current)) if prefer_best => metric.beats(value, current),
                Some((_, current)) => metric.beats(current, value),
            };
            if replace {
                chosen = Some((name, value));
            }
        }
        chosen.map(|(name, value)| RankedScenario {
            scenario: name.to_string(),
            value,
        })
    }

    /// Best-ranked scenario under `metric`, `None` when empty
    #[must_use]
    pub fn best(&self, metric: RankingMetric) -> Option<RankedScenario> {
        self.pick(metric, true)
    }

    #[must_use]
    pub fn worst(&self, metric: RankingMetric) -> Option<RankedScenario> {
        self.pick(metric, false)
    }

    /// Every scenario ordered best first; equal values keep caller order
    #[must_use]
    pub fn ranking(&self, metric: RankingMetric) -> Vec<RankedScenario> {
        let mut ranked: Vec<RankedScenario> = self
            .scenarios
            .iter()
            .map(|(name, stats)| RankedScenario {
                scenario: name.clone(),
                value: metric.value(stats),
            })
            .collect();
        ranked.sort_by(|a, b| {
            let order = a.value.total_cmp(&b.value);
            if metric.higher_is_better() {
                order.reverse()
            } else {
                order
            }
        });
        ranked
    }

    /// Distance between the best and worst values under `metric`
    #[must_use]
    pub fn spread(&self, metric: RankingMetric) -> f64 {
        match (self.best(metric), self.worst(metric)) {
            (Some(best), Some(worst)) => (best.value - worst.value).abs(),
            _ => 0.0,
        }
    }

    /// Mean over standard deviation of the named scenario
    #[must_use]
    pub fn risk_adjusted_ratio(&self, scenario: &str) -> Option<f64> {
        self.statistics(scenario)
            .map(ScenarioStatistics::risk_adjusted_ratio)
    }
}

//! Summary statistics over a scenario's outcome sample.
//!
//! Percentiles interpolate linearly between order statistics with
//! `rank = p * (n - 1)`. Degenerate inputs (empty sample, zero variance) give
//! 0 for every derived figure rather than NaN.

use serde::{Deserialize, Serialize};

use crate::model::OutcomeSample;

/// Outcome values sorted ascending, kept for threshold and tail queries
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SortedSample {
    values: Vec<f64>,
}

impl SortedSample {
    #[must_use]
    pub fn new(mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        Self { values }
    }

    #[must_use]
    pub fn from_sample(sample: &OutcomeSample) -> Self {
        Self::new(sample.values().to_vec())
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.values.first().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }

    /// Middle value; the mean of the central pair for even lengths
    #[must_use]
    pub fn median(&self) -> f64 {
        let n = self.values.len();
        match n {
            0 => 0.0,
            _ if n % 2 == 0 => 0.5 * (self.values[n / 2 - 1] + self.values[n / 2]),
            _ => self.values[n / 2],
        }
    }

    /// Interpolated percentile for `p` in `[0, 1]` (clamped)
    #[must_use]
    pub fn percentile(&self, p: f64) -> f64 {
        let n = self.values.len();
        if n == 0 {
            return 0.0;
        }
        let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
        let lo = rank.floor() as usize;
        let hi = rank.ceil() as usize;
        let lower = self.values[lo];
        lower + (self.values[hi] - lower) * (rank - lo as f64)
    }

    /// Fraction of outcomes strictly greater than `threshold`
    #[must_use]
    pub fn probability_above(&self, threshold: f64) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let at_or_below = self.values.partition_point(|&v| v <= threshold);
        (self.values.len() - at_or_below) as f64 / self.values.len() as f64
    }

    /// Fraction of outcomes strictly less than `threshold`
    #[must_use]
    pub fn probability_below(&self, threshold: f64) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let below = self.values.partition_point(|&v| v < threshold);
        below as f64 / self.values.len() as f64
    }

    /// Outcome at the `p` quantile of the low tail
    #[must_use]
    pub fn value_at_risk(&self, p: f64) -> f64 {
        self.percentile(p)
    }

    /// Mean of the worst `p` fraction of outcomes, always at least one
    #[must_use]
    pub fn expected_shortfall(&self, p: f64) -> f64 {
        let n = self.values.len();
        if n == 0 {
            return 0.0;
        }
        let tail = ((p.clamp(0.0, 1.0) * n as f64).ceil() as usize).clamp(1, n);
        self.values[..tail].iter().sum::<f64>() / tail as f64
    }
}

/// Summary of one scenario's outcome distribution
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioStatistics {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1); 0 for a single outcome
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

impl ScenarioStatistics {
    #[must_use]
    pub fn from_sample(sample: &OutcomeSample) -> Self {
        Self::from_sorted(&SortedSample::from_sample(sample))
    }

    #[must_use]
    pub fn from_sorted(sorted: &SortedSample) -> Self {
        let (mean, std_dev) = mean_and_std_dev(sorted.values());
        Self {
            count: sorted.len(),
            mean,
            median: sorted.median(),
            std_dev,
            min: sorted.min(),
            max: sorted.max(),
            p5: sorted.percentile(0.05),
            p25: sorted.percentile(0.25),
            p50: sorted.percentile(0.50),
            p75: sorted.percentile(0.75),
            p95: sorted.percentile(0.95),
        }
    }

    /// Mean per unit of standard deviation; 0 without dispersion
    #[must_use]
    pub fn risk_adjusted_ratio(&self) -> f64 {
        if self.std_dev > 0.0 {
            self.mean / self.std_dev
        } else {
            0.0
        }
    }
}

/// Welford's single-pass mean and Bessel-corrected standard deviation
fn mean_and_std_dev(values: &[f64]) -> (f64, f64) {
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for (i, &x) in values.iter().enumerate() {
        let delta = x - mean;
        mean += delta / (i + 1) as f64;
        m2 += delta * (x - mean);
    }
    let std_dev = if values.len() > 1 {
        (m2 / (values.len() - 1) as f64).sqrt()
    } else {
        0.0
    };
    (mean, std_dev)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welford_matches_two_pass() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let (mean, std_dev) = mean_and_std_dev(&values);
        assert!((mean - 5.0).abs() < 1e-12);
        // Two-pass: sum of squares 32 over n - 1 = 7
        assert!((std_dev - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(mean_and_std_dev(&[3.5]), (3.5, 0.0));
    }
}

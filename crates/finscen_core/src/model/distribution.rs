use rand::Rng;
use rand::distr::{Distribution as _, Uniform};
use serde::{Deserialize, Serialize};

use crate::error::DistributionError;

/// Standard deviations of headroom a normal draw must have before overflow
const TAIL_SIGMAS: f64 = 10.0;

/// Multiples of the mean an exponential draw must have before overflow
const EXP_TAIL: f64 = 64.0;

/// Probability distribution assigned to a stochastic model input.
///
/// Serialized with an internal `type` tag:
/// `{"type": "normal", "mean": 0.0, "stdDev": 1.0}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Distribution {
    Normal {
        mean: f64,
        std_dev: f64,
    },
    /// Uniform density over `[min, max)`
    Uniform {
        min: f64,
        max: f64,
    },
    Triangular {
        min: f64,
        mode: f64,
        max: f64,
    },
    /// Exponential with the given rate (mean `1 / rate`)
    Exponential {
        rate: f64,
    },
    /// `exp(X)` where `X ~ Normal(log_mean, log_std_dev)`
    LogNormal {
        log_mean: f64,
        log_std_dev: f64,
    },
}

impl Distribution {
    #[must_use]
    pub fn family(&self) -> &'static str {
        match self {
            Distribution::Normal { .. } => "normal",
            Distribution::Uniform { .. } => "uniform",
            Distribution::Triangular { .. } => "triangular",
            Distribution::Exponential { .. } => "exponential",
            Distribution::LogNormal { .. } => "lognormal",
        }
    }

    /// Check the parameter invariants of this distribution.
    pub fn validate(&self) -> Result<(), DistributionError> {
        let fail = |reason| {
            Err(DistributionError {
                family: self.family(),
                reason,
            })
        };

        match *self {
            Distribution::Normal { mean, std_dev } => {
                if !mean.is_finite() || !std_dev.is_finite() {
                    return fail("parameters must be finite");
                }
                if std_dev <= 0.0 {
                    return fail("std_dev must be positive");
                }
                if !(mean.abs() + TAIL_SIGMAS * std_dev).is_finite() {
                    return fail("draws would overflow");
                }
            }
            Distribution::Uniform { min, max } => {
                if !min.is_finite() || !max.is_finite() {
                    return fail("parameters must be finite");
                }
                if min >= max {
                    return fail("min must be less than max");
                }
                if !(max - min).is_finite() {
                    return fail("range would overflow");
                }
            }
            Distribution::Triangular { min, mode, max } => {
                if !min.is_finite() || !mode.is_finite() || !max.is_finite() {
                    return fail("parameters must be finite");
                }
                if min >= max {
                    return fail("min must be less than max");
                }
                if !(max - min).is_finite() {
                    return fail("range would overflow");
                }
                if mode < min || mode > max {
                    return fail("mode must lie within [min, max]");
                }
            }
            Distribution::Exponential { rate } => {
                if !rate.is_finite() || rate <= 0.0 {
                    return fail("rate must be positive and finite");
                }
                if !(EXP_TAIL / rate).is_finite() {
                    return fail("draws would overflow");
                }
            }
            Distribution::LogNormal {
                log_mean,
                log_std_dev,
            } => {
                if !log_mean.is_finite() || !log_std_dev.is_finite() {
                    return fail("parameters must be finite");
                }
                if log_std_dev <= 0.0 {
                    return fail("log_std_dev must be positive");
                }
                if log_mean + TAIL_SIGMAS * log_std_dev >= f64::MAX.ln() {
                    return fail("draws would overflow");
                }
            }
        }
        Ok(())
    }

    /// Analytic expectation of the distribution
    #[must_use]
    pub fn mean(&self) -> f64 {
        match *self {
            Distribution::Normal { mean, .. } => mean,
            Distribution::Uniform { min, max } => 0.5 * (min + max),
            Distribution::Triangular { min, mode, max } => (min + mode + max) / 3.0,
            Distribution::Exponential { rate } => 1.0 / rate,
            Distribution::LogNormal {
                log_mean,
                log_std_dev,
            } => (log_mean + 0.5 * log_std_dev * log_std_dev).exp(),
        }
    }

    /// Validate once and build a reusable sampler.
    pub fn sampler(&self) -> Result<Sampler, DistributionError> {
        self.validate()?;
        let rejected = || DistributionError {
            family: self.family(),
            reason: "rejected by sampler",
        };

        let sampler = match *self {
            Distribution::Normal { mean, std_dev } => Sampler::Normal(
                rand_distr::Normal::new(mean, std_dev).map_err(|_| rejected())?,
            ),
            Distribution::Uniform { min, max } => {
                Sampler::Uniform(Uniform::new(min, max).map_err(|_| rejected())?)
            }
            Distribution::Triangular { min, mode, max } => Sampler::Triangular { min, mode, max },
            Distribution::Exponential { rate } => {
                Sampler::Exponential(rand_distr::Exp::new(rate).map_err(|_| rejected())?)
            }
            Distribution::LogNormal {
                log_mean,
                log_std_dev,
            } => Sampler::LogNormal(
                rand_distr::LogNormal::new(log_mean, log_std_dev).map_err(|_| rejected())?,
            ),
        };
        Ok(sampler)
    }

    /// Draw a single sample, validating the parameters first.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, DistributionError> {
        Ok(self.sampler()?.sample(rng))
    }
}

/// A validated distribution ready for repeated sampling
#[derive(Debug, Clone)]
pub enum Sampler {
    Normal(rand_distr::Normal<f64>),
    Uniform(Uniform<f64>),
    Triangular { min: f64, mode: f64, max: f64 },
    Exponential(rand_distr::Exp<f64>),
    LogNormal(rand_distr::LogNormal<f64>),
}

impl Sampler {
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Normal(d) => d.sample(rng),
            Sampler::Uniform(d) => d.sample(rng),
            Sampler::Triangular { min, mode, max } => {
                sample_triangular(*min, *mode, *max, rng.random::<f64>())
            }
            Sampler::Exponential(d) => d.sample(rng),
            Sampler::LogNormal(d) => d.sample(rng),
        }
    }
}

/// Inverse CDF of the triangular distribution at `u ∈ [0, 1)`
#[inline]
pub(crate) fn sample_triangular(min: f64, mode: f64, max: f64, u: f64) -> f64 {
    let range = max - min;
    let fc = (mode - min) / range;
    let x = if u < fc {
        min + (u * range * (mode - min)).sqrt()
    } else {
        max - ((1.0 - u) * range * (max - mode)).sqrt()
    };
    x.clamp(min, max)
}

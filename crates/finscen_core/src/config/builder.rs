//! Analysis Builder
//!
//! Fluent construction of an [`AnalysisConfig`]. Builders never validate;
//! problems surface when the analysis is validated or run.

use std::time::Duration;

use super::AnalysisConfig;
use crate::model::{Distribution, InputAssignment, ScenarioDefinition};

/// Draws per scenario when not set explicitly
pub const DEFAULT_ITERATIONS: usize = 1_000;

/// Builder for an analysis request
#[derive(Debug, Clone)]
pub struct AnalysisBuilder {
    config: AnalysisConfig,
}

impl AnalysisBuilder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            config: AnalysisConfig {
                model: model.into(),
                iterations: DEFAULT_ITERATIONS,
                ..Default::default()
            },
        }
    }

    /// Replace the input list
    #[must_use]
    pub fn inputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.input_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Append one input
    #[must_use]
    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.config.input_names.push(name.into());
        self
    }

    #[must_use]
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.config.iterations = iterations;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    #[must_use]
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.config.thresholds.push(threshold);
        self
    }

    #[must_use]
    pub fn thresholds(mut self, thresholds: impl IntoIterator<Item = f64>) -> Self {
        self.config.thresholds.extend(thresholds);
        self
    }

    #[must_use]
    pub fn scenario(mut self, scenario: ScenarioBuilder) -> Self {
        self.config.scenarios.push(scenario.build());
        self
    }

    #[must_use]
    pub fn build(self) -> AnalysisConfig {
        self.config
    }
}

/// Builder for one scenario's input assignments
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    definition: ScenarioDefinition,
}

impl ScenarioBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            definition: ScenarioDefinition::new(name),
        }
    }

    #[must_use]
    pub fn assign(mut self, input: impl Into<String>, assignment: InputAssignment) -> Self {
        self.definition = self.definition.with_input(input, assignment);
        self
    }

    #[must_use]
    pub fn fixed(self, input: impl Into<String>, value: f64) -> Self {
        self.assign(input, InputAssignment::Fixed(value))
    }

    #[must_use]
    pub fn distribution(self, input: impl Into<String>, distribution: Distribution) -> Self {
        self.assign(input, InputAssignment::Sampled(distribution))
    }

    #[must_use]
    pub fn normal(self, input: impl Into<String>, mean: f64, std_dev: f64) -> Self {
        self.distribution(input, Distribution::Normal { mean, std_dev })
    }

    #[must_use]
    pub fn uniform(self, input: impl Into<String>, min: f64, max: f64) -> Self {
        self.distribution(input, Distribution::Uniform { min, max })
    }

    #[must_use]
    pub fn triangular(self, input: impl Into<String>, min: f64, mode: f64, max: f64) -> Self {
        self.distribution(input, Distribution::Triangular { min, mode, max })
    }

    #[must_use]
    pub fn exponential(self, input: impl Into<String>, rate: f64) -> Self {
        self.distribution(input, Distribution::Exponential { rate })
    }

    #[must_use]
    pub fn lognormal(self, input: impl Into<String>, log_mean: f64, log_std_dev: f64) -> Self {
        self.distribution(
            input,
            Distribution::LogNormal {
                log_mean,
                log_std_dev,
            },
        )
    }

    #[must_use]
    pub fn build(self) -> ScenarioDefinition {
        self.definition
    }
}

//! Scenario analysis lifecycle.
//!
//! `ScenarioAnalysis` moves through `Configured -> Validated -> Running` and
//! ends in `Completed` (with a report) or `Failed` (with the error). Both
//! terminal states are final.

use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use rustc_hash::FxHashSet;

use super::comparison::ScenarioComparison;
use super::report::{AnalysisReport, ComparisonSummary, ScenarioReport, ThresholdRow};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, ConfigError, RunError};
use crate::expr::Model;
use crate::model::{AnalysisProgress, OutcomeSample, ScenarioConfig};
use crate::simulation::{run_scenario, validate_iterations};
use crate::statistics::SortedSample;

/// Externally visible lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisState {
    Configured,
    Validated,
    Running,
    Completed,
    Failed,
}

impl AnalysisState {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Configured => "configured",
            Self::Validated => "validated",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Everything resolved by validation
#[derive(Debug, Clone)]
struct Prepared {
    model: Model,
    scenarios: Vec<ScenarioConfig>,
    seed: u64,
}

#[derive(Debug)]
enum Phase {
    Configured,
    Validated(Prepared),
    Running,
    Completed(AnalysisReport),
    Failed(AnalysisError),
}

/// One analysis request and its lifecycle
#[derive(Debug)]
pub struct ScenarioAnalysis {
    config: AnalysisConfig,
    phase: Phase,
}

impl ScenarioAnalysis {
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            phase: Phase::Configured,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> AnalysisState {
        match self.phase {
            Phase::Configured => AnalysisState::Configured,
            Phase::Validated(_) => AnalysisState::Validated,
            Phase::Running => AnalysisState::Running,
            Phase::Completed(_) => AnalysisState::Completed,
            Phase::Failed(_) => AnalysisState::Failed,
        }
    }

    /// Compile the model and resolve every scenario.
    ///
    /// A no-op once validated. The first problem moves the analysis to
    /// `Failed` and is returned.
    pub fn validate(&mut self) -> Result<(), AnalysisError> {
        match self.phase {
            Phase::Configured => {}
            Phase::Validated(_) => return Ok(()),
            _ => return Err(self.invalid_state("validate")),
        }

        match prepare(&self.config) {
            Ok(prepared) => {
                tracing::debug!(
                    scenarios = prepared.scenarios.len(),
                    iterations = self.config.iterations,
                    seed = prepared.seed,
                    "analysis validated"
                );
                self.phase = Phase::Validated(prepared);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "analysis configuration rejected");
                let err = AnalysisError::Config(err);
                self.phase = Phase::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Run every scenario and assemble the report, validating first if needed.
    pub fn run(&mut self, progress: &AnalysisProgress) -> Result<&AnalysisReport, AnalysisError> {
        if matches!(self.phase, Phase::Configured) {
            self.validate()?;
        }
        let prepared = match std::mem::replace(&mut self.phase, Phase::Running) {
            Phase::Validated(prepared) => prepared,
            other => {
                self.phase = other;
                return Err(self.invalid_state("run"));
            }
        };

        self.phase = match execute(&self.config, prepared, progress) {
            Ok(report) => Phase::Completed(report),
            Err(err) => {
                tracing::warn!(error = %err, "analysis failed");
                Phase::Failed(err)
            }
        };
        match &self.phase {
            Phase::Completed(report) => Ok(report),
            Phase::Failed(err) => Err(err.clone()),
            _ => Err(self.invalid_state("run")),
        }
    }

    /// The report, only once `Completed`
    #[must_use]
    pub fn report(&self) -> Option<&AnalysisReport> {
        match &self.phase {
            Phase::Completed(report) => Some(report),
            _ => None,
        }
    }

    /// The terminal error, only once `Failed`
    #[must_use]
    pub fn error(&self) -> Option<&AnalysisError> {
        match &self.phase {
            Phase::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Consume the analysis, yielding its report or terminal error.
    pub fn into_report(self) -> Result<AnalysisReport, AnalysisError> {
        match self.phase {
            Phase::Completed(report) => Ok(report),
            Phase::Failed(err) => Err(err),
            _ => Err(AnalysisError::InvalidState {
                operation: "take the report of",
                state: self.state().label(),
            }),
        }
    }

    fn invalid_state(&self, operation: &'static str) -> AnalysisError {
        AnalysisError::InvalidState {
            operation,
            state: self.state().label(),
        }
    }
}

/// Validate and run `config` in one call.
pub fn run_analysis(config: AnalysisConfig) -> Result<AnalysisReport, AnalysisError> {
    run_analysis_with_progress(config, &AnalysisProgress::new())
}

pub fn run_analysis_with_progress(
    config: AnalysisConfig,
    progress: &AnalysisProgress,
) -> Result<AnalysisReport, AnalysisError> {
    let mut analysis = ScenarioAnalysis::new(config);
    analysis.run(progress)?;
    analysis.into_report()
}

fn prepare(config: &AnalysisConfig) -> Result<Prepared, ConfigError> {
    let model = Model::compile(&config.model, &config.input_names)?;
    validate_iterations(config.iterations)?;

    if config.scenarios.is_empty() {
        return Err(ConfigError::NoScenarios);
    }
    let mut seen = FxHashSet::default();
    for scenario in &config.scenarios {
        if !seen.insert(scenario.name.as_str()) {
            return Err(ConfigError::DuplicateScenario(scenario.name.clone()));
        }
    }
    if let Some(&bad) = config.thresholds.iter().find(|t| !t.is_finite()) {
        return Err(ConfigError::InvalidThreshold(bad));
    }

    let scenarios = config
        .scenarios
        .iter()
        .map(|definition| ScenarioConfig::new(definition, &model))
        .collect::<Result<Vec<_>, _>>()?;

    let seed = config.seed.unwrap_or_else(|| rand::rng().random());

    Ok(Prepared {
        model,
        scenarios,
        seed,
    })
}

fn execute(
    config: &AnalysisConfig,
    prepared: Prepared,
    progress: &AnalysisProgress,
) -> Result<AnalysisReport, AnalysisError> {
    let Prepared {
        model,
        scenarios,
        seed,
    } = prepared;
    let iterations = config.iterations;
    let started = Instant::now();

    let mut progress = progress.scoped();
    if let Some(timeout) = config.timeout() {
        let deadline = started + timeout;
        if progress.deadline().is_none_or(|current| deadline < current) {
            progress = progress.with_deadline(deadline);
        }
    }
    progress.reset(iterations * scenarios.len());

    // One seed per scenario, in request order
    let mut seeder = SmallRng::seed_from_u64(seed);
    let seeds: Vec<u64> = scenarios.iter().map(|_| seeder.next_u64()).collect();

    tracing::info!(
        scenarios = scenarios.len(),
        iterations,
        seed,
        "running scenario analysis"
    );

    let run_one = |index: usize| -> Result<OutcomeSample, AnalysisError> {
        let scenario = &scenarios[index];
        let result = run_scenario(&model, scenario, iterations, seeds[index], &progress);
        if matches!(result, Err(RunError::Evaluation { .. })) {
            progress.abort();
        }
        result.map_err(|err| AnalysisError::from_run(scenario.name(), err))
    };

    #[cfg(feature = "parallel")]
    let results: Vec<_> = (0..scenarios.len()).into_par_iter().map(run_one).collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<_> = (0..scenarios.len()).map(run_one).collect();

    let samples = merge_results(results)?;
    let sorted: Vec<SortedSample> = samples.iter().map(SortedSample::from_sample).collect();
    let report = build_report(seed, iterations, &scenarios, &sorted, &config.thresholds);

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        best_by_mean = %report.comparison.best_by_mean.scenario,
        "scenario analysis completed"
    );
    Ok(report)
}

/// The first evaluation failure in request order beats any interruption.
fn merge_results(
    results: Vec<Result<OutcomeSample, AnalysisError>>,
) -> Result<Vec<OutcomeSample>, AnalysisError> {
    let mut samples = Vec::with_capacity(results.len());
    let mut interrupted = None;
    for result in results {
        match result {
            Ok(sample) => samples.push(sample),
            Err(err @ AnalysisError::Evaluation { .. }) => return Err(err),
            Err(err) => {
                interrupted.get_or_insert(err);
            }
        }
    }
    match interrupted {
        Some(err) => Err(err),
        None => Ok(samples),
    }
}

fn build_report(
    seed: u64,
    iterations: usize,
    scenarios: &[ScenarioConfig],
    sorted: &[SortedSample],
    thresholds: &[f64],
) -> AnalysisReport {
    let reports: Vec<ScenarioReport> = scenarios
        .iter()
        .zip(sorted)
        .map(|(scenario, sorted)| ScenarioReport::new(scenario.name(), sorted))
        .collect();

    let pairs: Vec<(&str, _)> = reports
        .iter()
        .map(|r| (r.name.as_str(), r.statistics))
        .collect();
    let comparison = ComparisonSummary::from_comparison(&ScenarioComparison::new(&pairs));

    let thresholds = thresholds
        .iter()
        .map(|&threshold| {
            ThresholdRow::new(
                threshold,
                scenarios.iter().map(ScenarioConfig::name).zip(sorted),
            )
        })
        .collect();

    AnalysisReport {
        seed,
        iterations,
        scenarios: reports,
        comparison,
        thresholds,
    }
}

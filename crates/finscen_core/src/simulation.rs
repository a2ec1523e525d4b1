use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

use crate::error::{ConfigError, RunError};
use crate::expr::Model;
use crate::model::{AnalysisProgress, OutcomeSample, ScenarioConfig};

/// Upper bound on draws per scenario
pub const MAX_ITERATIONS: usize = 100_000;

/// Draws per batch. Each batch owns an RNG, so output does not depend on how
/// batches are scheduled.
const BATCH_SIZE: usize = 100;

pub fn validate_iterations(iterations: usize) -> Result<(), ConfigError> {
    if iterations == 0 || iterations > MAX_ITERATIONS {
        return Err(ConfigError::IterationsOutOfRange {
            requested: iterations,
            max: MAX_ITERATIONS,
        });
    }
    Ok(())
}

/// Per-batch RNG seeds derived from the scenario seed
fn batch_seeds(seed: u64, iterations: usize) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..iterations.div_ceil(BATCH_SIZE))
        .map(|_| rng.next_u64())
        .collect()
}

/// Draw `iterations` input vectors for `scenario` and evaluate the model on
/// each one.
///
/// The result is identical for a given seed whether batches run on rayon or
/// sequentially. The first failing evaluation (lowest iteration) fails the
/// whole run; cancellation and the progress deadline are checked before each
/// batch.
pub fn run_scenario(
    model: &Model,
    scenario: &ScenarioConfig,
    iterations: usize,
    seed: u64,
    progress: &AnalysisProgress,
) -> Result<OutcomeSample, RunError> {
    validate_iterations(iterations)?;
    let started = Instant::now();
    let seeds = batch_seeds(seed, iterations);

    // Lowest batch index that failed to evaluate; later batches are skipped
    let first_failed = AtomicUsize::new(usize::MAX);

    let run_batch = |(index, batch_seed): (usize, u64)| -> Result<Vec<f64>, RunError> {
        if index > first_failed.load(Ordering::Relaxed) {
            return Err(RunError::Cancelled);
        }
        if let Some(interrupted) = progress.interruption() {
            return Err(interrupted);
        }

        let start = index * BATCH_SIZE;
        let len = BATCH_SIZE.min(iterations - start);
        let mut rng = SmallRng::seed_from_u64(batch_seed);
        let mut inputs = vec![0.0; scenario.input_count()];
        let mut stack = Vec::new();
        let mut outcomes = Vec::with_capacity(len);

        for offset in 0..len {
            scenario.fill_inputs(&mut rng, &mut inputs);
            match model.evaluate_with(&inputs, &mut stack) {
                Ok(value) => outcomes.push(value),
                Err(error) => {
                    first_failed.fetch_min(index, Ordering::Relaxed);
                    return Err(RunError::Evaluation {
                        iteration: start + offset,
                        error,
                    });
                }
            }
        }

        progress.add_completed(len);
        Ok(outcomes)
    };

    #[cfg(feature = "parallel")]
    let batches: Vec<_> = seeds.into_par_iter().enumerate().map(run_batch).collect();
    #[cfg(not(feature = "parallel"))]
    let batches: Vec<_> = seeds.into_iter().enumerate().map(run_batch).collect();

    let outcomes = merge_batches(batches, iterations).inspect_err(|err| {
        tracing::debug!(scenario = scenario.name(), error = %err, "scenario run stopped");
    })?;

    tracing::debug!(
        scenario = scenario.name(),
        iterations,
        seed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scenario run finished"
    );
    Ok(OutcomeSample::new(outcomes))
}

/// Concatenate batch outputs in order. An evaluation failure wins over an
/// interruption, and the earliest evaluation failure wins over later ones.
fn merge_batches(
    batches: Vec<Result<Vec<f64>, RunError>>,
    iterations: usize,
) -> Result<Vec<f64>, RunError> {
    let mut outcomes = Vec::with_capacity(iterations);
    let mut interrupted = None;

    for batch in batches {
        match batch {
            Ok(values) => outcomes.extend(values),
            Err(err @ RunError::Evaluation { .. }) => return Err(err),
            Err(err) => {
                interrupted.get_or_insert(err);
            }
        }
    }

    match interrupted {
        Some(err) => Err(err),
        None => Ok(outcomes),
    }
}

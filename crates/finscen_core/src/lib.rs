//! Scenario Monte Carlo analysis library
//!
//! This crate evaluates a small arithmetic model over named inputs under
//! several scenarios. Each scenario fixes some inputs and draws the rest from
//! probability distributions. It supports:
//! - Compiled model expressions with positional and named inputs
//! - Normal, uniform, triangular, exponential and lognormal inputs
//! - Reproducible, batch-seeded Monte Carlo runs (parallel with `rayon`)
//! - Per-scenario statistics, tail measures and threshold probabilities
//! - Ranking scenarios against each other
//!
//! # Builder DSL
//!
//! ```ignore
//! use finscen_core::{AnalysisBuilder, ScenarioBuilder, run_analysis};
//!
//! let config = AnalysisBuilder::new("volume * price * (1 - margin)")
//!     .inputs(["volume", "price", "margin"])
//!     .iterations(5_000)
//!     .scenario(ScenarioBuilder::new("Base")
//!         .normal("volume", 50_000.0, 2_500.0)
//!         .normal("price", 25.0, 1.0)
//!         .fixed("margin", 0.45))
//!     .scenario(ScenarioBuilder::new("Downturn")
//!         .triangular("volume", 30_000.0, 40_000.0, 50_000.0)
//!         .uniform("price", 20.0, 24.0)
//!         .fixed("margin", 0.40))
//!     .build();
//!
//! let report = run_analysis(config)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod error;
pub mod expr;
pub mod simulation;
pub mod statistics;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use analysis::{AnalysisReport, ScenarioAnalysis, run_analysis};
pub use config::{AnalysisBuilder, AnalysisConfig, ScenarioBuilder};
pub use error::{AnalysisError, ConfigError, EvaluationError, RunError};
pub use expr::Model;

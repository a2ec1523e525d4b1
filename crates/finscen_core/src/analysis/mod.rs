//! Scenario analysis module.
//!
//! Runs every scenario of an [`AnalysisConfig`](crate::config::AnalysisConfig)
//! through the Monte Carlo runner, summarizes each outcome sample and compares
//! the scenarios:
//!
//! ```ignore
//! use finscen_core::analysis::{ScenarioAnalysis, RankingMetric};
//! use finscen_core::model::AnalysisProgress;
//!
//! let progress = AnalysisProgress::new();
//! let mut analysis = ScenarioAnalysis::new(config);
//! let report = analysis.run(&progress)?;
//!
//! let ranking = report.comparator().ranking(RankingMetric::P5);
//! ```
//!
//! Cancel from another thread with `progress.cancel()`; the analysis ends in
//! the `Failed` state with `AnalysisError::Cancelled`.

mod comparison;
mod orchestrator;
mod report;

pub use comparison::*;
pub use orchestrator::*;
pub use report::*;

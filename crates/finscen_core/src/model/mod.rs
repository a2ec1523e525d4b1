//! Type definitions for scenario inputs, run progress and outcomes

mod distribution;
mod progress;
mod results;
mod scenario;

pub use distribution::{Distribution, Sampler};
pub use progress::AnalysisProgress;
pub use results::OutcomeSample;
pub use scenario::{InputAssignment, ScenarioConfig, ScenarioDefinition};


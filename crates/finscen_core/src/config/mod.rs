//! Analysis configuration
//!
//! `AnalysisConfig` is the complete request for one scenario analysis and the
//! serde data contract accepted by front ends. Build it by hand, deserialize
//! it, or use the builder DSL:
//!
//! ```ignore
//! use finscen_core::config::{AnalysisBuilder, ScenarioBuilder};
//!
//! let config = AnalysisBuilder::new("volume * price * (1 - margin)")
//!     .inputs(["volume", "price", "margin"])
//!     .iterations(5_000)
//!     .seed(42)
//!     .scenario(ScenarioBuilder::new("Base")
//!         .normal("volume", 50_000.0, 2_500.0)
//!         .normal("price", 25.0, 1.0)
//!         .fixed("margin", 0.45))
//!     .threshold(600_000.0)
//!     .build();
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::ScenarioDefinition;

pub mod builder;

pub use builder::{AnalysisBuilder, ScenarioBuilder};

/// Everything needed to run one scenario analysis
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Model inputs in positional order
    pub input_names: Vec<String>,
    /// Model expression over `input_names`
    pub model: String,
    /// Draws per scenario
    pub iterations: usize,
    pub scenarios: Vec<ScenarioDefinition>,
    /// Outcome levels to report exceedance probabilities for
    #[serde(default)]
    pub thresholds: Vec<f64>,
    /// Analysis seed; drawn at random and reported when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Wall-clock budget for the run in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl AnalysisConfig {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    #[must_use]
    pub fn scenario(&self, name: &str) -> Option<&ScenarioDefinition> {
        self.scenarios.iter().find(|s| s.name == name)
    }
}

use serde::{Deserialize, Serialize};

/// Model outcomes of one scenario's Monte Carlo run, one per iteration, in
/// iteration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutcomeSample {
    values: Vec<f64>,
}

impl OutcomeSample {
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
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
}

impl From<Vec<f64>> for OutcomeSample {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

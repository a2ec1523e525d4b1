use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

use rand::Rng;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;
use crate::expr::Model;

use super::distribution::{Distribution, Sampler};

/// How a scenario sets one model input.
///
/// Serialized externally tagged: `{"value": 0.45}` or
/// `{"distribution": {"type": "uniform", "min": 0.0, "max": 1.0}}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputAssignment {
    #[serde(rename = "value")]
    Fixed(f64),
    #[serde(rename = "distribution")]
    Sampled(Distribution),
}

impl From<f64> for InputAssignment {
    fn from(value: f64) -> Self {
        InputAssignment::Fixed(value)
    }
}

impl From<Distribution> for InputAssignment {
    fn from(distribution: Distribution) -> Self {
        InputAssignment::Sampled(distribution)
    }
}

/// A named scenario as supplied by the caller, keyed by input name
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_assignments")]
    pub inputs: BTreeMap<String, InputAssignment>,
}

/// Reads the `inputs` map, rejecting an input name that appears twice.
fn deserialize_assignments<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, InputAssignment>, D::Error>
where
    D: Deserializer<'de>,
{
    struct AssignmentsVisitor;

    impl<'de> Visitor<'de> for AssignmentsVisitor {
        type Value = BTreeMap<String, InputAssignment>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of input names to assignments")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut inputs = BTreeMap::new();
            while let Some((name, assignment)) = map.next_entry::<String, InputAssignment>()? {
                match inputs.entry(name) {
                    Entry::Vacant(slot) => {
                        slot.insert(assignment);
                    }
                    Entry::Occupied(slot) => {
                        return Err(de::Error::custom(ConfigError::DuplicateAssignment(
                            slot.key().clone(),
                        )));
                    }
                }
            }
            Ok(inputs)
        }
    }

    deserializer.deserialize_map(AssignmentsVisitor)
}

impl ScenarioDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_input(
        mut self,
        input: impl Into<String>,
        assignment: impl Into<InputAssignment>,
    ) -> Self {
        self.inputs.insert(input.into(), assignment.into());
        self
    }
}

/// Per-position plan for building an input vector
#[derive(Debug, Clone)]
enum InputPlan {
    Fixed(f64),
    Sampled(Sampler),
}

/// A scenario resolved against a model: one validated plan entry per input,
/// in model order.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    name: String,
    plan: Vec<InputPlan>,
}

impl ScenarioConfig {
    /// Resolve `definition` against the model's inputs.
    ///
    /// Checks, in order: unknown input names (sorted), missing inputs (model
    /// order), then each assignment's parameters (model order). The first
    /// problem found is returned, naming the scenario and the input.
    pub fn new(definition: &ScenarioDefinition, model: &Model) -> Result<Self, ConfigError> {
        let scenario = &definition.name;

        if let Some(unknown) = definition
            .inputs
            .keys()
            .find(|name| model.index_of(name).is_none())
        {
            return Err(ConfigError::UnknownInput {
                scenario: scenario.clone(),
                input: unknown.clone(),
            });
        }

        let mut plan = Vec::with_capacity(model.input_count());
        for input in model.input_names() {
            let Some(assignment) = definition.inputs.get(input) else {
                return Err(ConfigError::MissingInput {
                    scenario: scenario.clone(),
                    input: input.clone(),
                });
            };
            plan.push(assignment);
        }

        let plan = plan
            .into_iter()
            .zip(model.input_names())
            .map(|(assignment, input)| match *assignment {
                InputAssignment::Fixed(value) if value.is_finite() => Ok(InputPlan::Fixed(value)),
                InputAssignment::Fixed(value) => Err(ConfigError::InvalidFixedValue {
                    scenario: scenario.clone(),
                    input: input.clone(),
                    value,
                }),
                InputAssignment::Sampled(distribution) => distribution
                    .sampler()
                    .map(InputPlan::Sampled)
                    .map_err(|source| ConfigError::InvalidDistribution {
                        scenario: scenario.clone(),
                        input: input.clone(),
                        source,
                    }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: scenario.clone(),
            plan,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn input_count(&self) -> usize {
        self.plan.len()
    }

    /// Number of inputs drawn from a distribution on every iteration
    #[must_use]
    pub fn stochastic_count(&self) -> usize {
        self.plan
            .iter()
            .filter(|p| matches!(p, InputPlan::Sampled(_)))
            .count()
    }

    /// True when every input is fixed, so every draw is identical
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.stochastic_count() == 0
    }

    /// Fill `inputs` with one draw: fixed values verbatim, a fresh sample for
    /// each stochastic input.
    #[inline]
    pub fn fill_inputs<R: Rng + ?Sized>(&self, rng: &mut R, inputs: &mut [f64]) {
        debug_assert_eq!(inputs.len(), self.plan.len());
        for (slot, plan) in inputs.iter_mut().zip(&self.plan) {
            *slot = match plan {
                InputPlan::Fixed(value) => *value,
                InputPlan::Sampled(sampler) => sampler.sample(rng),
            };
        }
    }
}

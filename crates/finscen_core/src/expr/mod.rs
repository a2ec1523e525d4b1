//! Model expressions.
//!
//! A model is a small arithmetic expression over named inputs, compiled once
//! into postfix bytecode and evaluated against positional input vectors:
//!
//! ```ignore
//! use finscen_core::expr::Model;
//!
//! let model = Model::compile("volume * price * (1 - margin)", ["volume", "price", "margin"])?;
//! assert_eq!(model.evaluate(&[100.0, 2.0, 0.5])?, 100.0);
//! ```
//!
//! Supported syntax: numeric literals, input names, positional references
//! (`inputs[0]`), `+ - * /`, unary minus, parentheses and the functions
//! `sqrt`, `pow`, `exp` and `log`.

mod compiler;
mod lexer;
mod parser;
mod program;

use std::sync::Arc;

use crate::error::{ConfigError, EvaluationError};

use program::Program;

/// A compiled model expression over an ordered list of inputs.
///
/// Cheap to clone; the compiled program is shared. Evaluation holds no state,
/// so one `Model` can be used from many threads at once.
#[derive(Debug, Clone)]
pub struct Model {
    expression: Arc<str>,
    input_names: Arc<[String]>,
    program: Arc<Program>,
}

impl Model {
    /// Compile `expression` against the given ordered input names.
    ///
    /// Fails on empty or duplicate input names, syntax errors, unknown
    /// identifiers or functions, out-of-range positional references and
    /// division by a constant zero.
    pub fn compile<I, S>(expression: &str, input_names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let input_names: Vec<String> = input_names.into_iter().map(Into::into).collect();
        validate_input_names(&input_names)?;

        let tokens = lexer::tokenize(expression)?;
        let ast = parser::parse(tokens, expression.len())?;
        let program = compiler::compile(&ast, &input_names)?;

        tracing::debug!(
            expression,
            inputs = input_names.len(),
            ops = program.ops().len(),
            stack_depth = program.max_depth(),
            "compiled model expression"
        );

        Ok(Self {
            expression: Arc::from(expression),
            input_names: input_names.into(),
            program: Arc::new(program),
        })
    }

    /// The source expression
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Input names in positional order
    #[must_use]
    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    #[must_use]
    pub fn input_count(&self) -> usize {
        self.input_names.len()
    }

    /// Position of the named input, if declared
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.input_names.iter().position(|n| n == name)
    }

    /// Evaluate the model on one input vector (same order as `input_names`).
    pub fn evaluate(&self, inputs: &[f64]) -> Result<f64, EvaluationError> {
        let mut stack = Vec::new();
        self.program.evaluate_with(inputs, &mut stack)
    }

    /// Evaluate reusing `stack` as scratch space.
    pub fn evaluate_with(
        &self,
        inputs: &[f64],
        stack: &mut Vec<f64>,
    ) -> Result<f64, EvaluationError> {
        self.program.evaluate_with(inputs, stack)
    }
}

fn validate_input_names(names: &[String]) -> Result<(), ConfigError> {
    if names.is_empty() {
        return Err(ConfigError::EmptyInputs);
    }
    for (i, name) in names.iter().enumerate() {
        if !lexer::is_identifier(name) {
            return Err(ConfigError::InvalidInputName(name.clone()));
        }
        if names[..i].contains(name) {
            return Err(ConfigError::DuplicateInput(name.clone()));
        }
    }
    Ok(())
}

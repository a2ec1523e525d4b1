use std::fmt;

/// Errors related to distribution parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionError {
    pub family: &'static str,
    pub reason: &'static str,
}

impl fmt::Display for DistributionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} parameters: {}", self.family, self.reason)
    }
}

impl std::error::Error for DistributionError {}

/// Errors detected before any sampling takes place
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The model declares no inputs
    EmptyInputs,
    DuplicateInput(String),
    InvalidInputName(String),
    /// The analysis declares no scenarios
    NoScenarios,
    DuplicateScenario(String),
    /// A scenario assigns the same input more than once
    DuplicateAssignment(String),
    MissingInput {
        scenario: String,
        input: String,
    },
    UnknownInput {
        scenario: String,
        input: String,
    },
    InvalidDistribution {
        scenario: String,
        input: String,
        source: DistributionError,
    },
    InvalidFixedValue {
        scenario: String,
        input: String,
        value: f64,
    },
    InvalidThreshold(f64),
    IterationsOutOfRange {
        requested: usize,
        max: usize,
    },
    EmptyExpression,
    /// Lexing or parsing failure at a byte offset of the expression
    Syntax {
        position: usize,
        message: String,
    },
    UnknownIdentifier {
        name: String,
        position: usize,
    },
    UnknownFunction {
        name: String,
        position: usize,
    },
    Arity {
        function: &'static str,
        expected: usize,
        found: usize,
    },
    PositionalOutOfRange {
        index: usize,
        len: usize,
    },
    LiteralDivisionByZero {
        position: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyInputs => write!(f, "model must declare at least one input"),
            ConfigError::DuplicateInput(name) => write!(f, "input '{name}' is declared twice"),
            ConfigError::InvalidInputName(name) => write!(f, "invalid input name '{name}'"),
            ConfigError::NoScenarios => write!(f, "at least one scenario is required"),
            ConfigError::DuplicateScenario(name) => {
                write!(f, "scenario name '{name}' is used more than once")
            }
            ConfigError::DuplicateAssignment(input) => {
                write!(f, "input '{input}' is assigned more than once")
            }
            ConfigError::MissingInput { scenario, input } => {
                write!(f, "scenario '{scenario}' has no assignment for input '{input}'")
            }
            ConfigError::UnknownInput { scenario, input } => {
                write!(f, "scenario '{scenario}' assigns unknown input '{input}'")
            }
            ConfigError::InvalidDistribution {
                scenario,
                input,
                source,
            } => write!(f, "scenario '{scenario}', input '{input}': {source}"),
            ConfigError::InvalidFixedValue {
                scenario,
                input,
                value,
            } => write!(
                f,
                "scenario '{scenario}', input '{input}': fixed value {value} is not finite"
            ),
            ConfigError::InvalidThreshold(value) => {
                write!(f, "threshold {value} is not a finite number")
            }
            ConfigError::IterationsOutOfRange { requested, max } => {
                write!(f, "iteration count {requested} must be in range [1, {max}]")
            }
            ConfigError::EmptyExpression => write!(f, "model expression is empty"),
            ConfigError::Syntax { position, message } => {
                write!(f, "syntax error at offset {position}: {message}")
            }
            ConfigError::UnknownIdentifier { name, position } => {
                write!(f, "unknown identifier '{name}' at offset {position}")
            }
            ConfigError::UnknownFunction { name, position } => {
                write!(f, "unknown function '{name}' at offset {position}")
            }
            ConfigError::Arity {
                function,
                expected,
                found,
            } => write!(
                f,
                "function '{function}' takes {expected} argument(s), got {found}"
            ),
            ConfigError::PositionalOutOfRange { index, len } => {
                write!(f, "inputs[{index}] is out of range for {len} input(s)")
            }
            ConfigError::LiteralDivisionByZero { position } => {
                write!(f, "division by constant zero at offset {position}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidDistribution { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors raised while evaluating the compiled model on one input vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvaluationError {
    DomainError {
        function: &'static str,
        operand: f64,
    },
    DivisionByZero,
    /// An intermediate result overflowed or was otherwise not finite
    NonFinite,
    InputLength {
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationError::DomainError { function, operand } => {
                write!(f, "{function}({operand}) is outside the function's domain")
            }
            EvaluationError::DivisionByZero => write!(f, "division by zero"),
            EvaluationError::NonFinite => write!(f, "result is not a finite number"),
            EvaluationError::InputLength { expected, actual } => {
                write!(f, "expected {expected} input value(s), got {actual}")
            }
        }
    }
}

impl std::error::Error for EvaluationError {}

/// Errors from a single scenario's Monte Carlo run
#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    Config(ConfigError),
    Evaluation {
        iteration: usize,
        error: EvaluationError,
    },
    /// The run was cancelled before all draws completed
    Cancelled,
    DeadlineExceeded,
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Config(e) => write!(f, "configuration error: {e}"),
            RunError::Evaluation { iteration, error } => {
                write!(f, "evaluation failed at iteration {iteration}: {error}")
            }
            RunError::Cancelled => write!(f, "run cancelled"),
            RunError::DeadlineExceeded => write!(f, "run exceeded its deadline"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Config(e) => Some(e),
            RunError::Evaluation { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(err: ConfigError) -> Self {
        RunError::Config(err)
    }
}

/// Terminal error of a scenario analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    Config(ConfigError),
    Evaluation {
        scenario: String,
        iteration: usize,
        source: EvaluationError,
    },
    Cancelled,
    DeadlineExceeded,
    /// An operation was requested in a state that does not allow it
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
}

impl AnalysisError {
    /// Attribute a runner failure to the scenario that produced it
    pub fn from_run(scenario: &str, err: RunError) -> Self {
        match err {
            RunError::Config(e) => AnalysisError::Config(e),
            RunError::Evaluation { iteration, error } => AnalysisError::Evaluation {
                scenario: scenario.to_string(),
                iteration,
                source: error,
            },
            RunError::Cancelled => AnalysisError::Cancelled,
            RunError::DeadlineExceeded => AnalysisError::DeadlineExceeded,
        }
    }

    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, AnalysisError::Config(_))
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Config(e) => write!(f, "configuration error: {e}"),
            AnalysisError::Evaluation {
                scenario,
                iteration,
                source,
            } => write!(
                f,
                "scenario '{scenario}' failed at iteration {iteration}: {source}"
            ),
            AnalysisError::Cancelled => write!(f, "analysis cancelled"),
            AnalysisError::DeadlineExceeded => write!(f, "analysis exceeded its deadline"),
            AnalysisError::InvalidState { operation, state } => {
                write!(f, "cannot {operation} an analysis in state {state}")
            }
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Config(e) => Some(e),
            AnalysisError::Evaluation { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for AnalysisError {
    fn from(err: ConfigError) -> Self {
        AnalysisError::Config(err)
    }
}

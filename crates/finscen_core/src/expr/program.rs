//! Postfix bytecode and its stack evaluator.

use crate::error::EvaluationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnaryFn {
    Neg,
    Sqrt,
    Exp,
    Log,
}

impl UnaryFn {
    pub fn apply(self, x: f64) -> Result<f64, EvaluationError> {
        let value = match self {
            UnaryFn::Neg => -x,
            UnaryFn::Sqrt => {
                if x < 0.0 {
                    return Err(EvaluationError::DomainError {
                        function: "sqrt",
                        operand: x,
                    });
                }
                x.sqrt()
            }
            UnaryFn::Log => {
                if x <= 0.0 {
                    return Err(EvaluationError::DomainError {
                        function: "log",
                        operand: x,
                    });
                }
                x.ln()
            }
            UnaryFn::Exp => x.exp(),
        };
        finite(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryFn {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryFn {
    pub fn apply(self, a: f64, b: f64) -> Result<f64, EvaluationError> {
        let value = match self {
            BinaryFn::Add => a + b,
            BinaryFn::Sub => a - b,
            BinaryFn::Mul => a * b,
            BinaryFn::Div => {
                if b == 0.0 {
                    return Err(EvaluationError::DivisionByZero);
                }
                a / b
            }
            BinaryFn::Pow => {
                let value = a.powf(b);
                if value.is_nan() {
                    return Err(EvaluationError::DomainError {
                        function: "pow",
                        operand: a,
                    });
                }
                value
            }
        };
        finite(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Op {
    Const(f64),
    /// Push the input at this position
    Input(usize),
    Unary(UnaryFn),
    Binary(BinaryFn),
}

impl Op {
    /// Net change in stack depth after executing this op
    fn stack_effect(self) -> isize {
        match self {
            Op::Const(_) | Op::Input(_) => 1,
            Op::Unary(_) => 0,
            Op::Binary(_) => -1,
        }
    }
}

#[inline]
fn finite(value: f64) -> Result<f64, EvaluationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvaluationError::NonFinite)
    }
}

/// A compiled model: a flat postfix program over a positional input vector
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Program {
    ops: Vec<Op>,
    max_depth: usize,
    input_count: usize,
}

impl Program {
    pub fn new(ops: Vec<Op>, input_count: usize) -> Self {
        let mut depth: isize = 0;
        let mut max_depth: isize = 0;
        for op in &ops {
            depth += op.stack_effect();
            max_depth = max_depth.max(depth);
        }
        debug_assert_eq!(depth, 1, "program must leave exactly one value");
        Self {
            ops,
            max_depth: max_depth.unsigned_abs(),
            input_count,
        }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Evaluate with a caller-provided stack buffer, which is cleared first.
    ///
    /// Reusing the buffer across calls avoids one allocation per evaluation
    /// in the Monte Carlo hot loop.
    pub fn evaluate_with(
        &self,
        inputs: &[f64],
        stack: &mut Vec<f64>,
    ) -> Result<f64, EvaluationError> {
        if inputs.len() != self.input_count {
            return Err(EvaluationError::InputLength {
                expected: self.input_count,
                actual: inputs.len(),
            });
        }

        stack.clear();
        stack.reserve(self.max_depth);

        for &op in &self.ops {
            match op {
                Op::Const(c) => stack.push(c),
                Op::Input(i) => stack.push(inputs[i]),
                Op::Unary(f) => {
                    let x = stack.pop().ok_or(EvaluationError::NonFinite)?;
                    stack.push(f.apply(x)?);
                }
                Op::Binary(f) => {
                    let b = stack.pop().ok_or(EvaluationError::NonFinite)?;
                    let a = stack.pop().ok_or(EvaluationError::NonFinite)?;
                    stack.push(f.apply(a, b)?);
                }
            }
        }

        let result = stack.pop().ok_or(EvaluationError::NonFinite)?;
        finite(result)
    }
}

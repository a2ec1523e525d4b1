//! Lowering of the expression tree to postfix bytecode.
//!
//! Identifiers are resolved to input positions here, once, so evaluation never
//! touches names. Constant subexpressions are folded when they evaluate
//! cleanly; a folded divisor of zero is rejected outright.

use rustc_hash::FxHashMap;

use crate::error::ConfigError;

use super::parser::{Ast, BinaryOp};
use super::program::{BinaryFn, Op, Program, UnaryFn};

enum Builtin {
    Unary(UnaryFn),
    Binary(BinaryFn),
}

fn lookup_builtin(name: &str) -> Option<(&'static str, Builtin)> {
    match name {
        "sqrt" => Some(("sqrt", Builtin::Unary(UnaryFn::Sqrt))),
        "exp" => Some(("exp", Builtin::Unary(UnaryFn::Exp))),
        "log" => Some(("log", Builtin::Unary(UnaryFn::Log))),
        "pow" => Some(("pow", Builtin::Binary(BinaryFn::Pow))),
        _ => None,
    }
}

struct Scope<'a> {
    inputs: FxHashMap<&'a str, usize>,
    len: usize,
}

/// Compile a parsed expression against the ordered input names.
pub(crate) fn compile(ast: &Ast, input_names: &[String]) -> Result<Program, ConfigError> {
    let scope = Scope {
        inputs: input_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect(),
        len: input_names.len(),
    };
    let ops = lower(ast, &scope)?;
    Ok(Program::new(ops, input_names.len()))
}

fn as_constant(ops: &[Op]) -> Option<f64> {
    match ops {
        [Op::Const(c)] => Some(*c),
        _ => None,
    }
}

fn lower(ast: &Ast, scope: &Scope<'_>) -> Result<Vec<Op>, ConfigError> {
    match ast {
        Ast::Number(n) => Ok(vec![Op::Const(*n)]),
        Ast::Variable { name, position } => scope
            .inputs
            .get(name.as_str())
            .map(|&i| vec![Op::Input(i)])
            .ok_or_else(|| ConfigError::UnknownIdentifier {
                name: name.clone(),
                position: *position,
            }),
        Ast::Positional { index, .. } => {
            if *index < scope.len {
                Ok(vec![Op::Input(*index)])
            } else {
                Err(ConfigError::PositionalOutOfRange {
                    index: *index,
                    len: scope.len,
                })
            }
        }
        Ast::Negate(operand) => {
            let ops = lower(operand, scope)?;
            Ok(lower_unary(UnaryFn::Neg, ops))
        }
        Ast::Binary {
            op,
            lhs,
            rhs,
            position,
        } => {
            let lhs = lower(lhs, scope)?;
            let rhs = lower(rhs, scope)?;
            let f = match op {
                BinaryOp::Add => BinaryFn::Add,
                BinaryOp::Sub => BinaryFn::Sub,
                BinaryOp::Mul => BinaryFn::Mul,
                BinaryOp::Div => BinaryFn::Div,
            };
            if f == BinaryFn::Div && as_constant(&rhs) == Some(0.0) {
                return Err(ConfigError::LiteralDivisionByZero {
                    position: *position,
                });
            }
            Ok(lower_binary(f, lhs, rhs))
        }
        Ast::Call {
            name,
            args,
            position,
        } => {
            let Some((canonical, builtin)) = lookup_builtin(name) else {
                return Err(ConfigError::UnknownFunction {
                    name: name.clone(),
                    position: *position,
                });
            };
            match builtin {
                Builtin::Unary(f) => {
                    let [arg] = args.as_slice() else {
                        return Err(ConfigError::Arity {
                            function: canonical,
                            expected: 1,
                            found: args.len(),
                        });
                    };
                    Ok(lower_unary(f, lower(arg, scope)?))
                }
                Builtin::Binary(f) => {
                    let [a, b] = args.as_slice() else {
                        return Err(ConfigError::Arity {
                            function: canonical,
                            expected: 2,
                            found: args.len(),
                        });
                    };
                    Ok(lower_binary(f, lower(a, scope)?, lower(b, scope)?))
                }
            }
        }
    }
}

fn lower_unary(f: UnaryFn, mut ops: Vec<Op>) -> Vec<Op> {
    if let Some(c) = as_constant(&ops)
        && let Ok(folded) = f.apply(c)
    {
        return vec![Op::Const(folded)];
    }
    // Domain errors on constants are left for evaluation to report
    ops.push(Op::Unary(f));
    ops
}

fn lower_binary(f: BinaryFn, mut lhs: Vec<Op>, rhs: Vec<Op>) -> Vec<Op> {
    if let (Some(a), Some(b)) = (as_constant(&lhs), as_constant(&rhs))
        && let Ok(folded) = f.apply(a, b)
    {
        return vec![Op::Const(folded)];
    }
    lhs.extend(rhs);
    lhs.push(Op::Binary(f));
    lhs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::lexer::tokenize;
    use crate::expr::parser::parse;

    fn compile_str(source: &str, inputs: &[&str]) -> Result<Program, ConfigError> {
        let names: Vec<String> = inputs.iter().map(|s| s.to_string()).collect();
        let ast = parse(tokenize(source)?, source.len())?;
        compile(&ast, &names)
    }

    #[test]
    fn test_constant_folding() {
        let program = compile_str("x * (2 + 3) - sqrt(16)", &["x"]).unwrap();
        assert_eq!(
            program.ops(),
            &[
                Op::Input(0),
                Op::Const(5.0),
                Op::Binary(BinaryFn::Mul),
                Op::Const(4.0),
                Op::Binary(BinaryFn::Sub),
            ]
        );
    }

    #[test]
    fn test_folded_zero_divisor_rejected() {
        assert_eq!(
            compile_str("x / (1 - 1)", &["x"]).unwrap_err(),
            ConfigError::LiteralDivisionByZero { position: 2 }
        );
        assert!(compile_str("x / 0.0", &["x"]).is_err());
        // A runtime zero is not statically detectable
        assert!(compile_str("x / (x - x)", &["x"]).is_ok());
    }

    #[test]
    fn test_constant_domain_error_not_folded() {
        let program = compile_str("log(0) + x", &["x"]).unwrap();
        assert_eq!(program.ops()[1], Op::Unary(UnaryFn::Log));
    }

    #[test]
    fn test_function_names_do_not_shadow_inputs() {
        let program = compile_str("exp(e) + exp", &["e", "exp"]).unwrap();
        assert_eq!(
            program.ops(),
            &[
                Op::Input(0),
                Op::Unary(UnaryFn::Exp),
                Op::Input(1),
                Op::Binary(BinaryFn::Add),
            ]
        );
    }

    #[test]
    fn test_arity_and_unknown_function() {
        assert_eq!(
            compile_str("pow(x)", &["x"]).unwrap_err(),
            ConfigError::Arity {
                function: "pow",
                expected: 2,
                found: 1
            }
        );
        assert!(matches!(
            compile_str("max(x, 1)", &["x"]),
            Err(ConfigError::UnknownFunction { .. })
        ));
    }
}

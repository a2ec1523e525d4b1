//! Recursive-descent parser producing an unresolved expression tree.
//!
//! Grammar:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | primary
//! primary := NUMBER
//!          | IDENT '(' expr (',' expr)* ')'
//!          | 'inputs' '[' NUMBER ']'
//!          | IDENT
//!          | '(' expr ')'
//! ```

use crate::error::ConfigError;

use super::lexer::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Ast {
    Number(f64),
    Variable {
        name: String,
        position: usize,
    },
    Positional {
        index: usize,
        position: usize,
    },
    Negate(Box<Ast>),
    Binary {
        op: BinaryOp,
        lhs: Box<Ast>,
        rhs: Box<Ast>,
        position: usize,
    },
    Call {
        name: String,
        args: Vec<Ast>,
        position: usize,
    },
}

/// Identifier introducing a positional reference when followed by `[`
pub(crate) const POSITIONAL_KEYWORD: &str = "inputs";

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Length of the source, used to report errors at end of input
    end: usize,
}

impl Parser {
    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn current_position(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |t| t.position)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &TokenKind, context: &str) -> Result<(), ConfigError> {
        match self.tokens.get(self.pos) {
            Some(tok) if &tok.kind == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(tok) => Err(ConfigError::Syntax {
                position: tok.position,
                message: format!(
                    "expected {} {context}, found {}",
                    expected.describe(),
                    tok.kind.describe()
                ),
            }),
            None => Err(ConfigError::Syntax {
                position: self.end,
                message: format!("expected {} {context}, found end of input", expected.describe()),
            }),
        }
    }
}

/// Parse a token stream into an expression tree.
///
/// `source_len` is the byte length of the source expression.
pub(crate) fn parse(tokens: Vec<Token>, source_len: usize) -> Result<Ast, ConfigError> {
    if tokens.is_empty() {
        return Err(ConfigError::EmptyExpression);
    }

    let mut p = Parser {
        tokens,
        pos: 0,
        end: source_len,
    };
    let ast = parse_expr(&mut p)?;

    if let Some(tok) = p.advance() {
        let message = if tok.kind == TokenKind::RParen {
            "unbalanced parentheses: unexpected ')'".to_string()
        } else {
            format!("unexpected {} after complete expression", tok.kind.describe())
        };
        return Err(ConfigError::Syntax {
            position: tok.position,
            message,
        });
    }

    Ok(ast)
}

fn parse_expr(p: &mut Parser) -> Result<Ast, ConfigError> {
    let mut left = parse_term(p)?;
    loop {
        let op = match p.peek_kind() {
            Some(TokenKind::Plus) => BinaryOp::Add,
            Some(TokenKind::Minus) => BinaryOp::Sub,
            _ => break,
        };
        let position = p.current_position();
        p.advance();
        let right = parse_term(p)?;
        left = Ast::Binary {
            op,
            lhs: Box::new(left),
            rhs: Box::new(right),
            position,
        };
    }
    Ok(left)
}

fn parse_term(p: &mut Parser) -> Result<Ast, ConfigError> {
    let mut left = parse_unary(p)?;
    loop {
        let op = match p.peek_kind() {
            Some(TokenKind::Star) => BinaryOp::Mul,
            Some(TokenKind::Slash) => BinaryOp::Div,
            _ => break,
        };
        let position = p.current_position();
        p.advance();
        let right = parse_unary(p)?;
        left = Ast::Binary {
            op,
            lhs: Box::new(left),
            rhs: Box::new(right),
            position,
        };
    }
    Ok(left)
}

fn parse_unary(p: &mut Parser) -> Result<Ast, ConfigError> {
    match p.peek_kind() {
        Some(TokenKind::Minus) => {
            p.advance();
            Ok(Ast::Negate(Box::new(parse_unary(p)?)))
        }
        Some(TokenKind::Plus) => {
            p.advance();
            parse_unary(p)
        }
        _ => parse_primary(p),
    }
}

fn parse_primary(p: &mut Parser) -> Result<Ast, ConfigError> {
    let position = p.current_position();
    let Some(tok) = p.advance() else {
        return Err(ConfigError::Syntax {
            position,
            message: "expected an operand, found end of input".to_string(),
        });
    };

    match tok.kind {
        TokenKind::Number(n) => Ok(Ast::Number(n)),
        TokenKind::LParen => {
            let inner = parse_expr(p)?;
            match p.peek_kind() {
                Some(TokenKind::RParen) => {
                    p.advance();
                    Ok(inner)
                }
                None => Err(ConfigError::Syntax {
                    position: p.end,
                    message: "unbalanced parentheses: missing ')'".to_string(),
                }),
                Some(_) => p
                    .expect(&TokenKind::RParen, "to close '('")
                    .map(|()| inner),
            }
        }
        TokenKind::Ident(name) => match p.peek_kind() {
            Some(TokenKind::LParen) => {
                p.advance();
                let args = parse_arguments(p)?;
                Ok(Ast::Call {
                    name,
                    args,
                    position,
                })
            }
            Some(TokenKind::LBracket) if name == POSITIONAL_KEYWORD => {
                p.advance();
                let index = parse_index(p)?;
                p.expect(&TokenKind::RBracket, "to close 'inputs['")?;
                Ok(Ast::Positional { index, position })
            }
            _ => Ok(Ast::Variable { name, position }),
        },
        other => Err(ConfigError::Syntax {
            position,
            message: if other == TokenKind::RParen {
                "unbalanced parentheses: unexpected ')'".to_string()
            } else {
                format!("expected an operand, found {}", other.describe())
            },
        }),
    }
}

fn parse_arguments(p: &mut Parser) -> Result<Vec<Ast>, ConfigError> {
    let mut args = Vec::new();
    if matches!(p.peek_kind(), Some(TokenKind::RParen)) {
        p.advance();
        return Ok(args);
    }

    args.push(parse_expr(p)?);
    while matches!(p.peek_kind(), Some(TokenKind::Comma)) {
        p.advance();
        args.push(parse_expr(p)?);
    }

    if p.peek_kind().is_none() {
        return Err(ConfigError::Syntax {
            position: p.end,
            message: "unbalanced parentheses: missing ')'".to_string(),
        });
    }
    p.expect(&TokenKind::RParen, "to close argument list")?;
    Ok(args)
}

fn parse_index(p: &mut Parser) -> Result<usize, ConfigError> {
    let position = p.current_position();
    match p.peek_kind() {
        Some(TokenKind::Number(n)) if n.fract() == 0.0 && *n >= 0.0 => {
            // Guarded above: non-negative integral value
            let index = *n as usize;
            p.advance();
            Ok(index)
        }
        Some(kind) => Err(ConfigError::Syntax {
            position,
            message: format!(
                "positional index must be a non-negative integer, found {}",
                kind.describe()
            ),
        }),
        None => Err(ConfigError::Syntax {
            position,
            message: "expected positional index, found end of input".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::lexer::tokenize;

    fn parse_str(source: &str) -> Result<Ast, ConfigError> {
        parse(tokenize(source)?, source.len())
    }

    #[test]
    fn test_precedence_and_associativity() {
        // 1 - 2 - 3 parses as (1 - 2) - 3
        let ast = parse_str("1 - 2 - 3").unwrap();
        let Ast::Binary { op, lhs, .. } = ast else {
            panic!("expected binary node");
        };
        assert_eq!(op, BinaryOp::Sub);
        assert!(matches!(*lhs, Ast::Binary { op: BinaryOp::Sub, .. }));

        // a + b * c keeps the product on the right
        let ast = parse_str("a + b * c").unwrap();
        let Ast::Binary { op, rhs, .. } = ast else {
            panic!("expected binary node");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(*rhs, Ast::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn test_call_and_positional() {
        let ast = parse_str("pow(inputs[0], 2)").unwrap();
        let Ast::Call { name, args, .. } = ast else {
            panic!("expected call");
        };
        assert_eq!(name, "pow");
        assert_eq!(args.len(), 2);
        assert_eq!(
            args[0],
            Ast::Positional {
                index: 0,
                position: 4
            }
        );
    }

    #[test]
    fn test_unbalanced_parentheses() {
        let err = parse_str("(a + b").unwrap_err();
        assert!(err.to_string().contains("missing ')'"), "{err}");

        let err = parse_str("a + b)").unwrap_err();
        assert!(err.to_string().contains("unexpected ')'"), "{err}");

        let err = parse_str("sqrt(a").unwrap_err();
        assert!(err.to_string().contains("missing ')'"), "{err}");
    }

    #[test]
    fn test_trailing_operator() {
        let err = parse_str("a +").unwrap_err();
        assert_eq!(
            err,
            ConfigError::Syntax {
                position: 3,
                message: "expected an operand, found end of input".to_string()
            }
        );
    }

    #[test]
    fn test_non_integer_index() {
        assert!(matches!(
            parse_str("inputs[1.5]"),
            Err(ConfigError::Syntax { position: 7, .. })
        ));
    }

    #[test]
    fn test_empty_expression() {
        assert_eq!(parse_str("   "), Err(ConfigError::EmptyExpression));
    }
}

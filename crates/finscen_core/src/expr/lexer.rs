//! Tokenizer for model expressions.

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token in the source expression
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
}

impl TokenKind {
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => format!("number {n}"),
            TokenKind::Ident(name) => format!("identifier '{name}'"),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::Comma => "','".to_string(),
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// True if `name` lexes as a single identifier token.
pub(crate) fn is_identifier(name: &str) -> bool {
    match name.as_bytes().split_first() {
        Some((&first, rest)) => {
            is_ident_start(first) && rest.iter().all(|&b| is_ident_continue(b))
        }
        None => false,
    }
}

/// Split an expression into tokens.
///
/// Numbers accept an optional fraction and exponent (`1.5e-3`). An `e` that is
/// not followed by digits ends the number, so `2e` lexes as `2` then `e`.
pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, ConfigError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let b = bytes[pos];

        if b.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let single = match b {
            b'+' => Some(TokenKind::Plus),
            b'-' => Some(TokenKind::Minus),
            b'*' => Some(TokenKind::Star),
            b'/' => Some(TokenKind::Slash),
            b'(' => Some(TokenKind::LParen),
            b')' => Some(TokenKind::RParen),
            b'[' => Some(TokenKind::LBracket),
            b']' => Some(TokenKind::RBracket),
            b',' => Some(TokenKind::Comma),
            _ => None,
        };
        if let Some(kind) = single {
            tokens.push(Token {
                kind,
                position: pos,
            });
            pos += 1;
            continue;
        }

        if b.is_ascii_digit() || b == b'.' {
            let start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos < bytes.len() && bytes[pos] == b'.' {
                pos += 1;
                while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                    pos += 1;
                }
            }
            if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
                let mut lookahead = pos + 1;
                if lookahead < bytes.len() && (bytes[lookahead] == b'+' || bytes[lookahead] == b'-')
                {
                    lookahead += 1;
                }
                if lookahead < bytes.len() && bytes[lookahead].is_ascii_digit() {
                    pos = lookahead;
                    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                        pos += 1;
                    }
                }
            }
            let text = &source[start..pos];
            let value = text.parse::<f64>().map_err(|_| ConfigError::Syntax {
                position: start,
                message: format!("malformed number '{text}'"),
            })?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                position: start,
            });
            continue;
        }

        if is_ident_start(b) {
            let start = pos;
            while pos < bytes.len() && is_ident_continue(bytes[pos]) {
                pos += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident(source[start..pos].to_string()),
                position: start,
            });
            continue;
        }

        let ch = source[pos..].chars().next().unwrap_or('?');
        return Err(ConfigError::Syntax {
            position: pos,
            message: format!("unexpected character '{ch}'"),
        });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_numbers_and_exponents() {
        assert_eq!(
            kinds("1.5e3 + .25"),
            vec![
                TokenKind::Number(1500.0),
                TokenKind::Plus,
                TokenKind::Number(0.25)
            ]
        );
        assert_eq!(
            kinds("2e"),
            vec![TokenKind::Number(2.0), TokenKind::Ident("e".to_string())]
        );
    }

    #[test]
    fn test_positional_reference_tokens() {
        assert_eq!(
            kinds("inputs[1]"),
            vec![
                TokenKind::Ident("inputs".to_string()),
                TokenKind::LBracket,
                TokenKind::Number(1.0),
                TokenKind::RBracket
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("a % b").unwrap_err();
        assert_eq!(
            err,
            ConfigError::Syntax {
                position: 2,
                message: "unexpected character '%'".to_string()
            }
        );
    }

    #[test]
    fn test_lone_dot_is_malformed() {
        assert!(matches!(
            tokenize("a + ."),
            Err(ConfigError::Syntax { position: 4, .. })
        ));
    }
}

//! Lexer: tokenizes agent configuration text
//!
//! The format is line oriented. Every non-blank, non-comment line is one of
//!
//! - `key = value` → [`TokenKind::Key`], [`TokenKind::Value`]
//! - `<pattern> {` → [`TokenKind::Pattern`], [`TokenKind::OpenBrace`]
//! - `}`           → [`TokenKind::CloseBrace`]
//!
//! Lines starting with `#` or `//` are comments. Values are the rest of the
//! line, trimmed, or a double-quoted string with `\"`, `\\`, `\n` and `\t`
//! escapes.

use crate::errors::{ConfigError, ConfigResult};

/// A token produced by the lexer
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token text (unescaped for quoted values)
    pub text: String,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub col: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            col,
        }
    }
}

/// Token types
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Left-hand side of an assignment
    Key,
    /// Right-hand side of an assignment
    Value,
    /// Pattern expression opening a matcher block
    Pattern,
    OpenBrace,
    CloseBrace,
    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key => write!(f, "key"),
            Self::Value => write!(f, "value"),
            Self::Pattern => write!(f, "pattern"),
            Self::OpenBrace => write!(f, "{{"),
            Self::CloseBrace => write!(f, "}}"),
            Self::Eof => write!(f, "end of input"),
        }
    }
}

/// Lexer for agent configuration text
pub struct Lexer<'a> {
    input: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> ConfigResult<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut line_no = 0;

        for (index, raw) in self.input.lines().enumerate() {
            line_no = index + 1;
            self.tokenize_line(raw, line_no, &mut tokens)?;
        }

        tokens.push(Token::new(TokenKind::Eof, "", line_no + 1, 1));
        Ok(tokens)
    }

    fn tokenize_line(&self, raw: &str, line: usize, tokens: &mut Vec<Token>) -> ConfigResult<()> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            return Ok(());
        }
        let col = column_of(raw, trimmed);

        if trimmed == "}" {
            tokens.push(Token::new(TokenKind::CloseBrace, "}", line, col));
            return Ok(());
        }

        if let Some(head) = trimmed.strip_suffix('{') {
            let pattern = head.trim_end();
            if pattern.is_empty() {
                return Err(ConfigError::Syntax {
                    line,
                    message: "missing pattern before '{'".into(),
                });
            }
            tokens.push(Token::new(TokenKind::Pattern, pattern, line, col));
            tokens.push(Token::new(
                TokenKind::OpenBrace,
                "{",
                line,
                col + pattern.chars().count() + (head.len() - pattern.len()),
            ));
            return Ok(());
        }

        if let Some((key, rest)) = trimmed.split_once('=') {
            tokens.push(Token::new(TokenKind::Key, key.trim_end(), line, col));
            let value_start = rest.trim_start();
            let value_col = column_of(raw, value_start);
            let value = if value_start.starts_with('"') {
                read_quoted(value_start, line)?
            } else {
                value_start.trim_end().to_string()
            };
            tokens.push(Token::new(TokenKind::Value, value, line, value_col));
            return Ok(());
        }

        Err(ConfigError::Syntax {
            line,
            message: format!(
                "expected 'key = value', '<pattern> {{' or '}}', found '{}'",
                trimmed
            ),
        })
    }
}

/// Unescape a double-quoted value; only whitespace may follow the closing quote
fn read_quoted(text: &str, line: usize) -> ConfigResult<String> {
    let mut value = String::new();
    let mut chars = text.char_indices().skip(1);

    while let Some((i, ch)) = chars.next() {
        match ch {
            '"' => {
                let trailing = &text[i + 1..];
                if !trailing.trim().is_empty() {
                    return Err(ConfigError::Syntax {
                        line,
                        message: format!("unexpected text after quoted value: '{}'", trailing.trim()),
                    });
                }
                return Ok(value);
            }
            '\\' => match chars.next() {
                Some((_, '"')) => value.push('"'),
                Some((_, '\\')) => value.push('\\'),
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, other)) => {
                    return Err(ConfigError::Syntax {
                        line,
                        message: format!("unknown escape sequence '\\{}'", other),
                    });
                }
                None => break,
            },
            other => value.push(other),
        }
    }

    Err(ConfigError::Syntax {
        line,
        message: "unterminated quoted value".into(),
    })
}

/// 1-based column of `part`, which must be a subslice of `line`
fn column_of(line: &str, part: &str) -> usize {
    let offset = part.as_ptr() as usize - line.as_ptr() as usize;
    line[..offset].chars().count() + 1
}

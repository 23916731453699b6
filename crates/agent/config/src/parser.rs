//! Parser: recursive descent parser for agent configuration text
//!
//! Consumes tokens from the lexer and produces a [`ParsedConfiguration`],
//! an ordered list of directives that the resolver flattens into a
//! [`ResolvedConfiguration`](crate::ResolvedConfiguration).

use crate::errors::{ConfigError, ConfigResult};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::properties::Property;
use agent_types::MetricPattern;
use std::collections::HashMap;

/// Deepest allowed nesting of matcher blocks
pub const MAX_NESTING: usize = 64;

/// Parsed configuration, in declaration order
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedConfiguration {
    directives: Vec<Directive>,
}

/// A single top-level or block-level statement
#[derive(Clone, Debug, PartialEq)]
pub enum Directive {
    /// `key = value`
    Property { property: Property, line: usize },
    /// `<pattern> { ... }`
    Matcher(MatcherBlock),
}

/// A parsed matcher block
#[derive(Clone, Debug, PartialEq)]
pub struct MatcherBlock {
    /// The block's own pattern, not combined with enclosing blocks
    pub pattern: MetricPattern,
    /// Pattern text as written
    pub source: String,
    /// Line of the opening `{`
    pub line: usize,
    /// Assignments and nested blocks, in declaration order
    pub directives: Vec<Directive>,
}

impl ParsedConfiguration {
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Top-level assignments, in declaration order
    pub fn global_properties(&self) -> impl Iterator<Item = &Property> {
        self.directives.iter().filter_map(|d| match d {
            Directive::Property { property, .. } => Some(property),
            Directive::Matcher(_) => None,
        })
    }

    /// Top-level matcher blocks, in declaration order
    pub fn matcher_blocks(&self) -> impl Iterator<Item = &MatcherBlock> {
        self.directives.iter().filter_map(|d| match d {
            Directive::Matcher(block) => Some(block),
            Directive::Property { .. } => None,
        })
    }
}

/// Parser for agent configuration text
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Matcher blocks currently open
    depth: usize,
}

impl Parser {
    /// Parse configuration text into a ParsedConfiguration
    pub fn parse(input: &str) -> ConfigResult<ParsedConfiguration> {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize()?;
        let mut parser = Self {
            tokens,
            pos: 0,
            depth: 0,
        };
        let directives = parser.parse_directives(None)?;

        tracing::debug!(
            directives = directives.len(),
            "Parsed agent configuration"
        );
        Ok(ParsedConfiguration { directives })
    }

    /// Parse statements until the end of input (top level) or the `}`
    /// closing the block opened at `opened_at`
    fn parse_directives(&mut self, opened_at: Option<usize>) -> ConfigResult<Vec<Directive>> {
        let mut directives = Vec::new();
        // Block-local keys must be unique; globals are last-write-wins
        let mut seen: HashMap<String, usize> = HashMap::new();

        loop {
            match self.peek_kind() {
                TokenKind::Key => {
                    let (property, line) = self.parse_assignment()?;
                    if opened_at.is_some() {
                        if let Some(&first_line) = seen.get(&property.key) {
                            return Err(ConfigError::DuplicateKey {
                                line,
                                key: property.key,
                                first_line,
                            });
                        }
                        seen.insert(property.key.clone(), line);
                    }
                    directives.push(Directive::Property { property, line });
                }
                TokenKind::Pattern => {
                    let block = self.parse_block()?;
                    directives.push(Directive::Matcher(block));
                }
                TokenKind::CloseBrace => {
                    let line = self.peek().line;
                    if opened_at.is_none() {
                        return Err(ConfigError::UnexpectedClose(line));
                    }
                    self.advance();
                    return Ok(directives);
                }
                TokenKind::Eof => {
                    if let Some(line) = opened_at {
                        return Err(ConfigError::UnterminatedBlock(line));
                    }
                    return Ok(directives);
                }
                TokenKind::Value | TokenKind::OpenBrace => {
                    let tok = self.peek();
                    return Err(ConfigError::Syntax {
                        line: tok.line,
                        message: format!("unexpected {} '{}'", tok.kind, tok.text),
                    });
                }
            }
        }
    }

    fn parse_assignment(&mut self) -> ConfigResult<(Property, usize)> {
        let key_tok = self.expect(TokenKind::Key)?;
        let line = key_tok.line;
        let key = key_tok.text.clone();
        if !is_valid_key(&key) {
            return Err(ConfigError::InvalidKey { line, key });
        }

        let value = self.expect(TokenKind::Value)?.text.clone();
        Ok((Property::new(key, value), line))
    }

    fn parse_block(&mut self) -> ConfigResult<MatcherBlock> {
        let pattern_tok = self.expect(TokenKind::Pattern)?;
        let source = pattern_tok.text.clone();
        let pattern_line = pattern_tok.line;

        let pattern =
            MetricPattern::parse(&source).map_err(|e| ConfigError::InvalidPattern {
                line: pattern_line,
                pattern: source.clone(),
                source: e,
            })?;

        let line = self.expect(TokenKind::OpenBrace)?.line;
        if self.depth >= MAX_NESTING {
            return Err(ConfigError::Syntax {
                line,
                message: format!("matcher blocks nested too deeply (limit {})", MAX_NESTING),
            });
        }

        self.depth += 1;
        let directives = self.parse_directives(Some(line));
        self.depth -= 1;
        let directives = directives?;

        Ok(MatcherBlock {
            pattern,
            source,
            line,
            directives,
        })
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind.clone()
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) -> &Token {
        let tok = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: TokenKind) -> ConfigResult<&Token> {
        if self.check(kind.clone()) {
            Ok(self.advance())
        } else {
            let tok = self.peek();
            Err(ConfigError::Syntax {
                line: tok.line,
                message: format!("expected {}, found {} '{}'", kind, tok.kind, tok.text),
            })
        }
    }
}

/// Dot-separated segments of `[A-Za-z_][A-Za-z0-9_-]*`
fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.split('.').all(|segment| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        })
}

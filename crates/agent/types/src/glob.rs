//! Wildcard and regular-expression text matchers
//!
//! `Glob` understands `*` (any run of characters) and `?` (exactly one
//! character). Patterns without wildcards compare as plain strings so the
//! common literal case never touches the regex engine.

use crate::errors::{PatternError, PatternResult};
use regex::Regex;

/// A compiled wildcard pattern
#[derive(Clone, Debug)]
pub struct Glob {
    source: String,
    matcher: GlobMatcher,
}

#[derive(Clone, Debug)]
enum GlobMatcher {
    Any,
    Literal,
    Wildcard(Regex),
}

impl Glob {
    /// Compile a wildcard pattern
    pub fn new(pattern: &str) -> PatternResult<Self> {
        let matcher = if pattern == "*" {
            GlobMatcher::Any
        } else if has_wildcard(pattern) {
            GlobMatcher::Wildcard(compile_wildcard(pattern)?)
        } else {
            GlobMatcher::Literal
        };

        Ok(Self {
            source: pattern.to_string(),
            matcher,
        })
    }

    /// A glob matching every string
    pub fn any() -> Self {
        Self {
            source: "*".to_string(),
            matcher: GlobMatcher::Any,
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        match &self.matcher {
            GlobMatcher::Any => true,
            GlobMatcher::Literal => self.source == text,
            GlobMatcher::Wildcard(regex) => regex.is_match(text),
        }
    }

    /// True when the pattern contains no wildcard characters
    pub fn is_literal(&self) -> bool {
        matches!(self.matcher, GlobMatcher::Literal)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Glob {}

impl std::fmt::Display for Glob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// A regular expression that must match the whole subject
#[derive(Clone, Debug)]
pub struct RegexPattern {
    source: String,
    regex: Regex,
}

impl RegexPattern {
    /// Compile `source`; the expression is anchored at both ends
    pub fn new(source: &str) -> PatternResult<Self> {
        let regex =
            Regex::new(&format!("^(?:{})$", source)).map_err(|e| PatternError::InvalidRegex {
                pattern: source.to_string(),
                source: e,
            })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for RegexPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for RegexPattern {}

impl std::fmt::Display for RegexPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}/", self.source)
    }
}

/// If `text` is written as `/expr/`, return `expr`
pub(crate) fn strip_regex_delimiters(text: &str) -> PatternResult<Option<&str>> {
    let Some(rest) = text.strip_prefix('/') else {
        return Ok(None);
    };
    match rest.strip_suffix('/') {
        Some(inner) if !inner.is_empty() => Ok(Some(inner)),
        _ => Err(PatternError::UnterminatedRegex(text.to_string())),
    }
}

pub(crate) fn has_wildcard(text: &str) -> bool {
    text.contains(['*', '?'])
}

fn compile_wildcard(pattern: &str) -> PatternResult<Regex> {
    let mut expr = String::with_capacity(pattern.len() + 8);
    expr.push_str("(?s)^");
    let mut buf = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }
    expr.push('$');

    Regex::new(&expr).map_err(|e| PatternError::InvalidRegex {
        pattern: pattern.to_string(),
        source: e,
    })
}

//! Configuration error types

use agent_types::PatternError;
use std::path::PathBuf;

/// Errors that can occur while parsing, resolving or loading a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    // ── Syntax ───────────────────────────────────────────────────────
    #[error("Syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Unterminated matcher block opened at line {0}")]
    UnterminatedBlock(usize),

    #[error("Unexpected '}}' at line {0}: no matcher block is open")]
    UnexpectedClose(usize),

    #[error("Invalid key '{key}' at line {line}")]
    InvalidKey { line: usize, key: String },

    #[error("Duplicate key '{key}' at line {line}, first declared at line {first_line}")]
    DuplicateKey {
        line: usize,
        key: String,
        first_line: usize,
    },

    #[error("Invalid pattern '{pattern}' at line {line}: {source}")]
    InvalidPattern {
        line: usize,
        pattern: String,
        #[source]
        source: PatternError,
    },

    // ── Semantic ─────────────────────────────────────────────────────
    #[error("Missing required key: {0}")]
    MissingKey(String),

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Invalid number for '{key}': '{value}'")]
    NumberFormat {
        key: String,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    // ── Loading ──────────────────────────────────────────────────────
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Broad classification of a [`ConfigError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed configuration text
    Syntax,
    /// Well-formed text with a missing or invalid value
    Configuration,
    /// A typed accessor found a non-numeric value
    NumberFormat,
    /// The configuration source could not be read
    Io,
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax { .. }
            | Self::UnterminatedBlock(_)
            | Self::UnexpectedClose(_)
            | Self::InvalidKey { .. }
            | Self::DuplicateKey { .. }
            | Self::InvalidPattern { .. } => ErrorKind::Syntax,
            Self::MissingKey(_) | Self::InvalidValue { .. } => ErrorKind::Configuration,
            Self::NumberFormat { .. } => ErrorKind::NumberFormat,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Source line of a syntax error
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Syntax { line, .. }
            | Self::InvalidKey { line, .. }
            | Self::DuplicateKey { line, .. }
            | Self::InvalidPattern { line, .. } => Some(*line),
            Self::UnterminatedBlock(line) | Self::UnexpectedClose(line) => Some(*line),
            _ => None,
        }
    }

    pub(crate) fn invalid_value(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

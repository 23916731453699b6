//! Error types for metric identities and patterns

/// Errors that can occur while parsing object names or metric patterns
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("Empty pattern expression")]
    Empty,

    #[error("Missing ':' between domain and key properties in '{0}'")]
    MissingDomainSeparator(String),

    #[error("Invalid domain in '{name}': {message}")]
    InvalidDomain { name: String, message: String },

    #[error("Empty key property list in '{0}'")]
    EmptyPropertyList(String),

    #[error("Invalid key property '{entry}' in '{name}'")]
    InvalidProperty { name: String, entry: String },

    #[error("Duplicate key '{key}' in '{name}'")]
    DuplicateKey { name: String, key: String },

    #[error("Wildcards are not allowed in object name '{0}'")]
    WildcardInName(String),

    #[error("Unterminated quoted value in '{0}'")]
    UnterminatedQuote(String),

    #[error("Unterminated regular expression in '{0}'")]
    UnterminatedRegex(String),

    #[error("Invalid regular expression '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type alias for pattern operations
pub type PatternResult<T> = Result<T, PatternError>;

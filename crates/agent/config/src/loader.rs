//! Loader: one-call entry points from text or file to a resolved configuration

use crate::errors::{ConfigError, ConfigResult};
use crate::parser::Parser;
use crate::resolver::{self, ResolvedConfiguration};
use std::path::Path;

/// Parse and resolve configuration text
pub fn load(text: &str) -> ConfigResult<ResolvedConfiguration> {
    let parsed = Parser::parse(text)?;
    resolver::resolve(&parsed)
}

/// Read a UTF-8 configuration file, then [`load`] it
pub fn load_file(path: impl AsRef<Path>) -> ConfigResult<ResolvedConfiguration> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), bytes = text.len(), "Loading agent configuration");
    load(&text)
}

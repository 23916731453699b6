//! Typed read access to a flat property map

use crate::errors::{ConfigError, ConfigResult};
use crate::properties::Properties;

/// Read-only view over [`Properties`] with typed accessors and defaults
#[derive(Clone, Copy, Debug)]
pub struct Context<'a> {
    values: &'a Properties,
}

impl<'a> Context<'a> {
    pub fn new(values: &'a Properties) -> Self {
        Self { values }
    }

    pub fn get_string(&self, key: &str) -> Option<&'a str> {
        self.values.get(key)
    }

    pub fn get_string_or(&self, key: &str, default: &'a str) -> &'a str {
        self.values.get(key).unwrap_or(default)
    }

    /// Integer value of `key`, or `default` when absent.
    ///
    /// A present but non-numeric value is an error; it is never replaced by
    /// the default.
    pub fn get_integer(&self, key: &str, default: i64) -> ConfigResult<i64> {
        match self.values.get(key) {
            None => Ok(default),
            Some(value) => value.parse::<i64>().map_err(|e| ConfigError::NumberFormat {
                key: key.to_string(),
                value: value.to_string(),
                source: e,
            }),
        }
    }

    /// Boolean value of `key`, or `default` when absent.
    ///
    /// Only `true` (any ASCII case) reads as true; every other value reads
    /// as false.
    pub fn get_boolean(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            None => default,
            Some(value) => value.eq_ignore_ascii_case("true"),
        }
    }

    /// Comma-separated list with each entry trimmed
    pub fn get_list(&self, key: &str) -> Option<Vec<&'a str>> {
        self.values
            .get(key)
            .map(|value| value.split(',').map(str::trim).collect())
    }

    /// Every entry whose key starts with `prefix`, with the prefix stripped,
    /// in insertion order
    pub fn sub_properties(&self, prefix: &str) -> Properties {
        self.values
            .iter()
            .filter_map(|(key, value)| key.strip_prefix(prefix).map(|rest| (rest, value)))
            .collect()
    }
}

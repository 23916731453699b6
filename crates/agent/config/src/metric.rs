//! Typed view over the properties resolved for one metric

use crate::context::Context;
use crate::properties::Properties;
use serde::Serialize;

/// Key marking a metric as excluded from collection
pub const EXCLUDE_KEY: &str = "exclude";
/// Key overriding the measurement name
pub const NAME_KEY: &str = "name";
/// Prefix of per-metric tags
pub const TAGS_PREFIX: &str = "tags.";

/// Resolved properties of a single `(object name, attribute)` pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetricView {
    properties: Properties,
}

impl MetricView {
    pub fn new(properties: Properties) -> Self {
        Self { properties }
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn into_properties(self) -> Properties {
        self.properties
    }

    pub fn context(&self) -> Context<'_> {
        Context::new(&self.properties)
    }

    /// Whether `exclude` resolved to true
    pub fn is_excluded(&self) -> bool {
        self.context().get_boolean(EXCLUDE_KEY, false)
    }

    /// Measurement name override, or `default`
    pub fn measurement<'a>(&'a self, default: &'a str) -> &'a str {
        self.context().get_string_or(NAME_KEY, default)
    }

    /// Tags with the `tags.` prefix stripped
    pub fn tags(&self) -> Properties {
        self.context().sub_properties(TAGS_PREFIX)
    }
}

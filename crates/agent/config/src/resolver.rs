//! Resolver: flattens a parsed configuration and answers per-metric queries
//!
//! Resolution happens in two stages. [`resolve`] runs once per load: it
//! folds top-level assignments into the global map (last write wins),
//! validates the agent settings, and collects matchers in declaration order.
//! [`ResolvedConfiguration::resolve_for_metric`] runs on the collection hot
//! path: the first matching matcher to declare a key wins it, and globals
//! fill whatever no matcher set.

use crate::context::Context;
use crate::errors::ConfigResult;
use crate::metric::MetricView;
use crate::parser::{Directive, MatcherBlock, ParsedConfiguration};
use crate::properties::Properties;
use crate::settings::AgentSettings;
use agent_types::{MetricPattern, ObjectName};
use serde::Serialize;

/// A pattern with the properties it applies
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Matcher {
    /// Effective pattern, including every enclosing block's pattern
    pub pattern: MetricPattern,
    /// Properties declared directly in the block
    pub properties: Properties,
    /// Line of the block's opening `{`
    pub line: usize,
}

impl Matcher {
    pub fn matches(&self, name: &ObjectName, attribute: &str) -> bool {
        self.pattern.matches(name, attribute)
    }
}

/// Immutable, fully validated configuration
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedConfiguration {
    properties: Properties,
    matchers: Vec<Matcher>,
    #[serde(skip)]
    settings: AgentSettings,
}

impl ResolvedConfiguration {
    /// Global properties
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Matchers in evaluation order
    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    pub fn context(&self) -> Context<'_> {
        Context::new(&self.properties)
    }

    /// Effective properties for one attribute of one metric identity
    pub fn resolve_for_metric(&self, name: &ObjectName, attribute: &str) -> Properties {
        let mut result = Properties::with_capacity(self.properties.len());

        for matcher in self.matchers.iter().filter(|m| m.matches(name, attribute)) {
            for (key, value) in matcher.properties.iter() {
                result.insert_if_absent(key, value);
            }
        }

        for (key, value) in self.properties.iter() {
            result.insert_if_absent(key, value);
        }

        result
    }

    /// [`resolve_for_metric`](Self::resolve_for_metric) wrapped in a typed view
    pub fn resolve_metric(&self, name: &ObjectName, attribute: &str) -> MetricView {
        MetricView::new(self.resolve_for_metric(name, attribute))
    }
}

/// Flatten and validate a parsed configuration
pub fn resolve(parsed: &ParsedConfiguration) -> ConfigResult<ResolvedConfiguration> {
    let mut properties = Properties::new();
    let mut matchers = Vec::new();

    for directive in parsed.directives() {
        match directive {
            Directive::Property { property, .. } => {
                properties.insert(property.key.as_str(), property.value.as_str());
            }
            Directive::Matcher(block) => collect_matchers(block, None, &mut matchers),
        }
    }

    let settings = AgentSettings::from_context(&Context::new(&properties))?;

    tracing::debug!(
        properties = properties.len(),
        matchers = matchers.len(),
        servers = settings.servers.len(),
        "Resolved agent configuration"
    );

    Ok(ResolvedConfiguration {
        properties,
        matchers,
        settings,
    })
}

/// Emit `block` and its descendants. Nested blocks come before their
/// enclosing block so their keys win; siblings keep declaration order.
fn collect_matchers(
    block: &MatcherBlock,
    enclosing: Option<&MetricPattern>,
    out: &mut Vec<Matcher>,
) {
    let pattern = match enclosing {
        Some(outer) => outer.clone().and(block.pattern.clone()),
        None => block.pattern.clone(),
    };

    let mut properties = Properties::new();
    for directive in &block.directives {
        match directive {
            Directive::Property { property, .. } => {
                properties.insert(property.key.as_str(), property.value.as_str());
            }
            Directive::Matcher(inner) => collect_matchers(inner, Some(&pattern), out),
        }
    }

    out.push(Matcher {
        pattern,
        properties,
        line: block.line,
    });
}

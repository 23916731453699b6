//! Metric patterns
//!
//! A pattern expression pairs an object-name pattern with an optional
//! attribute pattern:
//!
//! ```text
//! java.lang:type=GarbageCollector,* :: Collection*
//! java.lang:type=Memory :: HeapMemoryUsage
//! kafka.server:*
//! /java\.nio:.*/ :: /(Count|MemoryUsed)/
//! ```
//!
//! Object-name patterns use the JMX conventions: `*` and `?` wildcards in the
//! domain and in values, and a trailing `*` entry to allow key properties the
//! pattern does not mention. Either side may instead be a `/regex/`; an
//! object-name regex is matched against the canonical name.

use crate::errors::{PatternError, PatternResult};
use crate::glob::{strip_regex_delimiters, Glob, RegexPattern};
use crate::object_name::{split_property, split_unquoted, ObjectName};
use serde::{Serialize, Serializer};

const ATTRIBUTE_SEPARATOR: &str = "::";

// ── Object name patterns ─────────────────────────────────────────────

/// Pattern over metric identities
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObjectNamePattern {
    /// JMX-style `domain:key=value,...[,*]` pattern
    Properties {
        source: String,
        domain: Glob,
        keys: Vec<(String, Glob)>,
        /// Whether names may carry keys the pattern does not list
        open: bool,
    },
    /// Regular expression over the canonical name
    Regex(RegexPattern),
}

impl ObjectNamePattern {
    pub fn parse(text: &str) -> PatternResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PatternError::Empty);
        }
        if let Some(expr) = strip_regex_delimiters(text)? {
            return Ok(Self::Regex(RegexPattern::new(expr)?));
        }

        let (domain, list) = text
            .split_once(':')
            .ok_or_else(|| PatternError::MissingDomainSeparator(text.to_string()))?;
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(PatternError::InvalidDomain {
                name: text.to_string(),
                message: "domain must not be empty".into(),
            });
        }
        if list.trim().is_empty() {
            return Err(PatternError::EmptyPropertyList(text.to_string()));
        }

        let mut keys: Vec<(String, Glob)> = Vec::new();
        let mut open = false;
        for entry in split_unquoted(text, list)? {
            let entry = entry.trim();
            if entry == "*" {
                open = true;
                continue;
            }
            let (key, value) = split_property(text, entry)?;
            if keys.iter().any(|(k, _)| k == key) {
                return Err(PatternError::DuplicateKey {
                    name: text.to_string(),
                    key: key.to_string(),
                });
            }
            keys.push((key.to_string(), Glob::new(value)?));
        }

        Ok(Self::Properties {
            source: text.to_string(),
            domain: Glob::new(domain)?,
            keys,
            open,
        })
    }

    /// Pattern matching every object name (`*:*`)
    pub fn any() -> Self {
        Self::Properties {
            source: "*:*".to_string(),
            domain: Glob::any(),
            keys: Vec::new(),
            open: true,
        }
    }

    pub fn matches(&self, name: &ObjectName) -> bool {
        match self {
            Self::Properties {
                domain, keys, open, ..
            } => {
                domain.is_match(name.domain())
                    && (*open || name.len() == keys.len())
                    && keys
                        .iter()
                        .all(|(key, value)| name.get(key).is_some_and(|v| value.is_match(v)))
            }
            Self::Regex(regex) => regex.is_match(&name.canonical_name()),
        }
    }
}

impl std::fmt::Display for ObjectNamePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Properties { source, .. } => f.write_str(source),
            Self::Regex(regex) => write!(f, "{}", regex),
        }
    }
}

// ── Attribute patterns ───────────────────────────────────────────────

/// Pattern over attribute names
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributePattern {
    Any,
    Glob(Glob),
    Regex(RegexPattern),
}

impl AttributePattern {
    pub fn parse(text: &str) -> PatternResult<Self> {
        let text = text.trim();
        if text.is_empty() || text == "*" {
            return Ok(Self::Any);
        }
        if let Some(expr) = strip_regex_delimiters(text)? {
            return Ok(Self::Regex(RegexPattern::new(expr)?));
        }
        Ok(Self::Glob(Glob::new(text)?))
    }

    pub fn matches(&self, attribute: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Glob(glob) => glob.is_match(attribute),
            Self::Regex(regex) => regex.is_match(attribute),
        }
    }
}

impl std::fmt::Display for AttributePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Glob(glob) => write!(f, "{}", glob),
            Self::Regex(regex) => write!(f, "{}", regex),
        }
    }
}

// ── Metric patterns ──────────────────────────────────────────────────

/// Pattern over `(object name, attribute)` pairs
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MetricPattern {
    ObjectName(ObjectNamePattern),
    Attribute(AttributePattern),
    /// Matches when every part matches
    Composite(Vec<MetricPattern>),
}

impl MetricPattern {
    /// Parse `<object name pattern> [:: <attribute pattern>]`
    pub fn parse(expr: &str) -> PatternResult<Self> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Err(PatternError::Empty);
        }

        let (object_part, attribute_part) = split_expression(expr)?;
        let object = ObjectNamePattern::parse(object_part)?;
        let attribute = match attribute_part {
            Some(text) => AttributePattern::parse(text)?,
            None => AttributePattern::Any,
        };

        Ok(Self::Composite(vec![
            Self::ObjectName(object),
            Self::Attribute(attribute),
        ]))
    }

    pub fn matches(&self, name: &ObjectName, attribute: &str) -> bool {
        match self {
            Self::ObjectName(pattern) => pattern.matches(name),
            Self::Attribute(pattern) => pattern.matches(attribute),
            Self::Composite(parts) => parts.iter().all(|p| p.matches(name, attribute)),
        }
    }

    /// Conjunction of `self` and `other`, flattening nested composites
    pub fn and(self, other: MetricPattern) -> MetricPattern {
        let mut parts = match self {
            Self::Composite(parts) => parts,
            single => vec![single],
        };
        match other {
            Self::Composite(more) => parts.extend(more),
            single => parts.push(single),
        }
        Self::Composite(parts)
    }
}

impl std::fmt::Display for MetricPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ObjectName(pattern) => write!(f, "{}", pattern),
            Self::Attribute(pattern) => write!(f, "{}", pattern),
            Self::Composite(parts) => {
                let mut iter = parts.iter().peekable();
                let mut first = true;
                while let Some(part) = iter.next() {
                    if !first {
                        f.write_str(" & ")?;
                    }
                    first = false;
                    write!(f, "{}", part)?;
                    if let Self::ObjectName(_) = part {
                        if let Some(Self::Attribute(attribute)) = iter.peek() {
                            write!(f, " {} {}", ATTRIBUTE_SEPARATOR, attribute)?;
                            iter.next();
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

impl Serialize for MetricPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Split an expression at the first `::` outside quotes and regex delimiters
fn split_expression(expr: &str) -> PatternResult<(&str, Option<&str>)> {
    let bytes = expr.as_bytes();
    let mut i = 0;
    let mut in_quotes = false;

    // An object-name regex runs to its closing '/'
    if bytes.first() == Some(&b'/') {
        i = 1;
        while i < bytes.len() && bytes[i] != b'/' {
            if bytes[i] == b'\\' {
                i += 1;
            }
            i += 1;
        }
        if i >= bytes.len() {
            return Err(PatternError::UnterminatedRegex(expr.to_string()));
        }
        i += 1;
    }

    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_quotes => i += 1,
            b'"' => in_quotes = !in_quotes,
            b':' if !in_quotes && bytes.get(i + 1) == Some(&b':') => {
                return Ok((&expr[..i], Some(&expr[i + 2..])));
            }
            _ => {}
        }
        i += 1;
    }

    Ok((expr, None))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const DOMAINS: [&str; 3] = ["java.lang", "java.nio", "kafka.server"];
    const VALUES: [&str; 4] = ["Memory", "MemoryPool", "Eden", "G1 Old Gen"];
    const ATTRIBUTES: [&str; 4] = ["HeapMemoryUsage", "CollectionCount", "Usage", "Count"];

    fn arb_name() -> impl Strategy<Value = ObjectName> {
        (
            prop::sample::select(DOMAINS.to_vec()),
            prop::collection::btree_map("[a-c]", prop::sample::select(VALUES.to_vec()), 1..4),
        )
            .prop_map(|(domain, keys)| {
                ObjectName::new(domain, keys).expect("generated names are valid")
            })
    }

    fn arb_glob(choices: &'static [&'static str]) -> impl Strategy<Value = String> {
        prop_oneof![
            Just("*".to_string()),
            prop::sample::select(choices.to_vec()).prop_map(str::to_string),
            prop::sample::select(choices.to_vec()).prop_map(|c| format!("{}*", &c[..2])),
            prop::sample::select(choices.to_vec()).prop_map(|c| format!("?{}", &c[1..])),
        ]
    }

    fn arb_expression() -> impl Strategy<Value = String> {
        (
            arb_glob(&DOMAINS),
            prop::collection::btree_map("[a-c]", arb_glob(&VALUES), 0..3),
            any::<bool>(),
            arb_glob(&ATTRIBUTES),
        )
            .prop_map(|(domain, keys, open, attribute)| {
                let mut entries: Vec<String> =
                    keys.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                if open || entries.is_empty() {
                    entries.push("*".to_string());
                }
                format!("{}:{} :: {}", domain, entries.join(","), attribute)
            })
    }

    /// The same name with its key properties in reverse order
    fn reversed(name: &ObjectName) -> ObjectName {
        let mut keys: Vec<(&str, &str)> = name.properties().collect();
        keys.reverse();
        ObjectName::new(name.domain(), keys).expect("reordering keeps a name valid")
    }

    proptest! {
        #[test]
        fn metric_pattern_is_conjunction_of_parts(
            expr in arb_expression(),
            name in arb_name(),
            attribute in prop::sample::select(ATTRIBUTES.to_vec()),
        ) {
            let (object_part, attribute_part) = split_expression(&expr).unwrap();
            let object = ObjectNamePattern::parse(object_part).unwrap();
            let attr = AttributePattern::parse(attribute_part.unwrap_or("")).unwrap();
            let pattern = MetricPattern::parse(&expr).unwrap();

            prop_assert_eq!(
                pattern.matches(&name, attribute),
                object.matches(&name) && attr.matches(attribute)
            );
        }

        #[test]
        fn matching_is_stable_and_ignores_key_order(
            expr in arb_expression(),
            name in arb_name(),
            attribute in prop::sample::select(ATTRIBUTES.to_vec()),
        ) {
            let pattern = MetricPattern::parse(&expr).unwrap();
            let first = pattern.matches(&name, attribute);

            prop_assert_eq!(pattern.matches(&name, attribute), first);
            prop_assert_eq!(pattern.matches(&reversed(&name), attribute), first);
        }

        #[test]
        fn display_reparses_to_same_matcher(
            expr in arb_expression(),
            name in arb_name(),
            attribute in prop::sample::select(ATTRIBUTES.to_vec()),
        ) {
            let pattern = MetricPattern::parse(&expr).unwrap();
            let reparsed = MetricPattern::parse(&pattern.to_string()).unwrap();
            prop_assert_eq!(reparsed.matches(&name, attribute), pattern.matches(&name, attribute));
        }
    }
}

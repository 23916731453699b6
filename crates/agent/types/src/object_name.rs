//! Metric identities
//!
//! An [`ObjectName`] follows the JMX naming convention: a domain followed by
//! an unordered list of `key=value` properties, e.g.
//! `java.lang:type=GarbageCollector,name=G1 Young Generation`.

use crate::errors::{PatternError, PatternResult};
use crate::glob::has_wildcard;
use serde::{Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A concrete metric identity
///
/// Key properties are unordered: names differing only in the order of their
/// keys are equal and hash alike, as their canonical names are.
#[derive(Clone, Debug)]
pub struct ObjectName {
    domain: String,
    /// Key properties in declaration order
    properties: Vec<(String, String)>,
}

impl ObjectName {
    /// Parse a name such as `java.lang:type=Memory`
    pub fn parse(name: &str) -> PatternResult<Self> {
        let (domain, list) = name
            .split_once(':')
            .ok_or_else(|| PatternError::MissingDomainSeparator(name.to_string()))?;

        if list.is_empty() {
            return Err(PatternError::EmptyPropertyList(name.to_string()));
        }

        let mut properties = Vec::new();
        for entry in split_unquoted(name, list)? {
            let (key, value) = split_property(name, entry)?;
            properties.push((key.to_string(), value.to_string()));
        }

        Self::new(domain, properties)
    }

    /// Build a name from a domain and key properties
    pub fn new<K, V>(
        domain: impl Into<String>,
        properties: impl IntoIterator<Item = (K, V)>,
    ) -> PatternResult<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let domain = domain.into();
        let properties: Vec<(String, String)> = properties
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let name = Self { domain, properties };
        name.validate()?;
        Ok(name)
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Value of the key property `key`, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Key properties in declaration order
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of key properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// The name with key properties sorted lexicographically by key
    pub fn canonical_name(&self) -> String {
        let list: Vec<String> = self
            .sorted_properties()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}:{}", self.domain, list.join(","))
    }

    fn sorted_properties(&self) -> Vec<&(String, String)> {
        let mut sorted: Vec<&(String, String)> = self.properties.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        sorted
    }

    fn validate(&self) -> PatternResult<()> {
        let display = self.to_string();

        if self.domain.is_empty() {
            return Err(PatternError::InvalidDomain {
                name: display,
                message: "domain must not be empty".into(),
            });
        }
        if self.domain.contains(':') {
            return Err(PatternError::InvalidDomain {
                name: display,
                message: "domain must not contain ':'".into(),
            });
        }
        if has_wildcard(&self.domain) {
            return Err(PatternError::WildcardInName(display));
        }
        if self.properties.is_empty() {
            return Err(PatternError::EmptyPropertyList(display));
        }

        for (i, (key, value)) in self.properties.iter().enumerate() {
            let quoted = is_quoted(value);
            if !is_valid_key(key) || value.is_empty() || (!quoted && value.contains([',', '=', ':']))
            {
                return Err(PatternError::InvalidProperty {
                    name: display,
                    entry: format!("{}={}", key, value),
                });
            }
            if !quoted && has_wildcard(value) {
                return Err(PatternError::WildcardInName(display));
            }
            if self.properties[..i].iter().any(|(k, _)| k == key) {
                return Err(PatternError::DuplicateKey {
                    name: display,
                    key: key.clone(),
                });
            }
        }
        Ok(())
    }
}

impl PartialEq for ObjectName {
    fn eq(&self, other: &Self) -> bool {
        self.domain == other.domain
            && self.properties.len() == other.properties.len()
            && self.sorted_properties() == other.sorted_properties()
    }
}

impl Eq for ObjectName {}

impl Hash for ObjectName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.domain.hash(state);
        self.sorted_properties().hash(state);
    }
}

impl std::fmt::Display for ObjectName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:", self.domain)?;
        for (i, (k, v)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        Ok(())
    }
}

impl FromStr for ObjectName {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ObjectName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Helpers shared with the pattern parser ───────────────────────────

/// Split a key property list on commas that are not inside a quoted value
pub(crate) fn split_unquoted<'a>(name: &str, list: &'a str) -> PatternResult<Vec<&'a str>> {
    let mut entries = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, ch) in list.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                entries.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if in_quotes {
        return Err(PatternError::UnterminatedQuote(name.to_string()));
    }
    entries.push(&list[start..]);
    Ok(entries)
}

/// Split a single `key=value` entry
pub(crate) fn split_property<'a>(name: &str, entry: &'a str) -> PatternResult<(&'a str, &'a str)> {
    match entry.split_once('=') {
        Some((key, value)) if is_valid_key(key) && !value.is_empty() => Ok((key, value)),
        _ => Err(PatternError::InvalidProperty {
            name: name.to_string(),
            entry: entry.to_string(),
        }),
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && !key.contains([':', '=', ',', '"', '*', '?', '\n'])
}

pub(crate) fn is_quoted(value: &str) -> bool {
    value.len() >= 2 && value.starts_with('"') && value.ends_with('"')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_ignores_key_order() {
        let a = ObjectName::parse("java.lang:type=MemoryPool,name=Eden").unwrap();
        let b = ObjectName::parse("java.lang:name=Eden,type=MemoryPool").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.canonical_name(), b.canonical_name());

        let seen: HashSet<ObjectName> = [a, b].into_iter().collect();
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_equality_compares_domain_and_values() {
        let a = ObjectName::parse("java.lang:type=MemoryPool,name=Eden").unwrap();
        assert_ne!(a, ObjectName::parse("java.nio:type=MemoryPool,name=Eden").unwrap());
        assert_ne!(a, ObjectName::parse("java.lang:type=MemoryPool,name=Old").unwrap());
        assert_ne!(a, ObjectName::parse("java.lang:type=MemoryPool").unwrap());
    }

    #[test]
    fn test_parse_simple_name() {
        let name = ObjectName::parse("java.lang:type=Memory").unwrap();
        assert_eq!(name.domain(), "java.lang");
        assert_eq!(name.get("type"), Some("Memory"));
        assert_eq!(name.get("name"), None);
        assert_eq!(name.len(), 1);
    }

    #[test]
    fn test_parse_keeps_declaration_order() {
        let name =
            ObjectName::parse("java.lang:type=GarbageCollector,name=G1 Young Generation").unwrap();
        let props: Vec<_> = name.properties().collect();
        assert_eq!(
            props,
            vec![("type", "GarbageCollector"), ("name", "G1 Young Generation")]
        );
        assert_eq!(
            name.to_string(),
            "java.lang:type=GarbageCollector,name=G1 Young Generation"
        );
    }

    #[test]
    fn test_canonical_name_sorts_keys() {
        let name = ObjectName::parse("java.lang:type=MemoryPool,name=Metaspace").unwrap();
        assert_eq!(
            name.canonical_name(),
            "java.lang:name=Metaspace,type=MemoryPool"
        );
    }

    #[test]
    fn test_quoted_value_may_contain_comma() {
        let name = ObjectName::parse(r#"app:type=Cache,name="a,b""#).unwrap();
        assert_eq!(name.get("name"), Some(r#""a,b""#));
    }

    #[test]
    fn test_missing_separator() {
        assert!(matches!(
            ObjectName::parse("java.lang"),
            Err(PatternError::MissingDomainSeparator(_))
        ));
    }

    #[test]
    fn test_empty_property_list() {
        assert!(matches!(
            ObjectName::parse("java.lang:"),
            Err(PatternError::EmptyPropertyList(_))
        ));
    }

    #[test]
    fn test_wildcards_rejected() {
        assert!(matches!(
            ObjectName::parse("java.lang:type=*"),
            Err(PatternError::WildcardInName(_))
        ));
        assert!(matches!(
            ObjectName::parse("java.*:type=Memory"),
            Err(PatternError::WildcardInName(_))
        ));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        assert!(matches!(
            ObjectName::parse("java.lang:type=Memory,type=Other"),
            Err(PatternError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn test_invalid_entry() {
        assert!(matches!(
            ObjectName::parse("java.lang:type"),
            Err(PatternError::InvalidProperty { .. })
        ));
        assert!(matches!(
            ObjectName::parse("java.lang:type="),
            Err(PatternError::InvalidProperty { .. })
        ));
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(matches!(
            ObjectName::parse(r#"app:name="open"#),
            Err(PatternError::UnterminatedQuote(_))
        ));
    }

    #[test]
    fn test_new_validates() {
        let name = ObjectName::new("kafka.server", [("type", "BrokerTopicMetrics")]).unwrap();
        assert_eq!(name.to_string(), "kafka.server:type=BrokerTopicMetrics");
        assert!(ObjectName::new("", [("type", "x")]).is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let name = ObjectName::parse("java.lang:type=Memory").unwrap();
        assert_eq!(
            serde_json::to_string(&name).unwrap(),
            "\"java.lang:type=Memory\""
        );
    }
}

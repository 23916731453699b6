//! Metric identity and pattern types for the JVM metrics agent
//!
//! The agent polls JMX attributes and ships them to InfluxDB. Every polled
//! value is identified by an [`ObjectName`] and an attribute name; the
//! configuration selects metrics with [`MetricPattern`]s.
//!
//! # Key Concepts
//!
//! - **ObjectName**: `domain:key=value,...`, the JMX naming convention.
//! - **ObjectNamePattern**: the same shape with `*`/`?` wildcards and an
//!   optional trailing `*` allowing extra keys, or a `/regex/`.
//! - **AttributePattern**: literal, glob or `/regex/` over attribute names.
//! - **MetricPattern**: the sum of the above plus conjunction.
//!
//! ```rust
//! use agent_types::{MetricPattern, ObjectName};
//!
//! let pattern = MetricPattern::parse("java.lang:type=GarbageCollector,* :: Collection*").unwrap();
//! let name = ObjectName::parse("java.lang:type=GarbageCollector,name=G1 Young Generation").unwrap();
//!
//! assert!(pattern.matches(&name, "CollectionCount"));
//! assert!(!pattern.matches(&name, "LastGcInfo"));
//! ```

#![deny(unsafe_code)]

mod errors;
mod glob;
mod object_name;
mod pattern;

pub use errors::{PatternError, PatternResult};
pub use glob::{Glob, RegexPattern};
pub use object_name::ObjectName;
pub use pattern::{AttributePattern, MetricPattern, ObjectNamePattern};

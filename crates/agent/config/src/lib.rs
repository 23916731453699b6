//! Configuration engine for the JVM metrics agent
//!
//! Parses the agent's configuration text into global properties plus an
//! ordered list of matchers, and resolves the effective properties of any
//! `(object name, attribute)` pair polled from JMX.
//!
//! # Configuration Syntax
//!
//! ```text
//! # InfluxDB connection
//! servers = influx-1:8086, influx-2
//! database = jvm
//! interval = 10
//! tags.host = "web-01"
//!
//! java.lang:type=GarbageCollector,* :: Collection* {
//!     name = gc
//!     java.lang:type=GarbageCollector,name=G1* {
//!         tags.collector = g1
//!     }
//! }
//!
//! java.lang:type=Memory :: HeapMemoryUsage {
//!     unit = bytes
//! }
//! ```
//!
//! For each metric the first matching matcher to declare a key wins it;
//! nested blocks are tried before their enclosing block, and global
//! properties fill whatever no matcher set.
//!
//! # Usage
//!
//! ```rust
//! use agent_config::load;
//! use agent_types::ObjectName;
//!
//! let config = load(r#"
//! servers = localhost
//! database = jvm
//! unit = count
//!
//! java.lang:type=Memory :: HeapMemoryUsage {
//!     unit = bytes
//! }
//! "#).unwrap();
//!
//! let memory = ObjectName::parse("java.lang:type=Memory").unwrap();
//! assert_eq!(config.resolve_for_metric(&memory, "HeapMemoryUsage").get("unit"), Some("bytes"));
//! assert_eq!(config.resolve_for_metric(&memory, "NonHeapMemoryUsage").get("unit"), Some("count"));
//! assert_eq!(config.settings().servers[0].to_string(), "localhost:8086");
//! ```

#![deny(unsafe_code)]

mod context;
mod errors;
mod handle;
mod lexer;
mod loader;
mod metric;
mod parser;
mod properties;
mod resolver;
mod settings;

pub use context::Context;
pub use errors::{ConfigError, ConfigResult, ErrorKind};
pub use handle::ConfigHandle;
pub use lexer::{Lexer, Token, TokenKind};
pub use loader::{load, load_file};
pub use metric::{MetricView, EXCLUDE_KEY, NAME_KEY, TAGS_PREFIX};
pub use parser::{Directive, MatcherBlock, ParsedConfiguration, Parser, MAX_NESTING};
pub use properties::{Properties, Property};
pub use resolver::{resolve, Matcher, ResolvedConfiguration};
pub use settings::{
    AgentSettings, Endpoint, DEFAULT_INTERVAL_SECS, DEFAULT_LOG_LEVEL, DEFAULT_PASSWORD,
    DEFAULT_PORT, DEFAULT_USER,
};

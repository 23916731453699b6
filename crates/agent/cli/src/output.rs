//! Output formatting utilities

use agent_config::{AgentSettings, Matcher, Properties, ResolvedConfiguration};
use serde::Serialize;

/// Output format for resolved properties
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `key=value` lines
    #[default]
    Text,
    /// JSON object
    Json,
}

/// Keys whose values are never printed
const REDACTED_KEYS: [&str; 1] = ["password"];
const REDACTED: &str = "******";

/// Resolved properties with secrets masked
pub fn redacted(properties: &Properties) -> Properties {
    properties
        .iter()
        .map(|(key, value)| {
            if REDACTED_KEYS.contains(&key) {
                (key, REDACTED)
            } else {
                (key, value)
            }
        })
        .collect()
}

/// Print properties as `key=value` lines
pub fn print_properties(properties: &Properties) {
    for (key, value) in properties.iter() {
        println!("{}={}", key, value);
    }
}

/// Print properties in the specified format
pub fn print_resolved(properties: &Properties, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            print_properties(properties);
            Ok(())
        }
        OutputFormat::Json => print_json(properties),
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Print the one-screen summary of a loaded configuration
pub fn print_summary(config: &ResolvedConfiguration) {
    let settings = config.settings();
    let servers: Vec<String> = settings.servers.iter().map(|s| s.to_string()).collect();

    println!("Configuration OK");
    println!("  Servers:   {}", servers.join(", "));
    println!("  Database:  {}", settings.database);
    println!("  Interval:  {}s", settings.interval_secs);
    println!("  Matchers:  {}", config.matchers().len());
}

/// Serialized form of `dump`: settings without the password, then matchers
#[derive(Serialize)]
pub struct Dump<'a> {
    pub settings: &'a AgentSettings,
    pub matchers: &'a [Matcher],
}

impl<'a> Dump<'a> {
    pub fn new(config: &'a ResolvedConfiguration) -> Self {
        Self {
            settings: config.settings(),
            matchers: config.matchers(),
        }
    }
}

//! Tracing subscriber setup
//!
//! Filter precedence: `RUST_LOG`, then `--log-level` / `AGENT_LOG_LEVEL`,
//! then `log.level` from the configuration file. Output goes to `log.path`
//! when set, stderr otherwise.

use agent_config::{AgentSettings, DEFAULT_LOG_LEVEL};
use anyhow::Context as _;
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging flags taken from the command line
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub level: Option<String>,
    pub json: bool,
}

/// Install the global subscriber.
///
/// `settings` is `None` when the configuration failed to load; logging then
/// falls back to stderr and the default level.
pub fn init(options: &LogOptions, settings: Option<&AgentSettings>) -> anyhow::Result<()> {
    let level = options
        .level
        .as_deref()
        .or(settings.map(|s| s.log_level.as_str()))
        .unwrap_or(DEFAULT_LOG_LEVEL);

    let (filter, rejected) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, None),
        Err(_) => level_filter(level),
    };

    let log_path = settings.and_then(|s| s.log_path.as_deref());
    let writer = match log_path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            BoxMakeWriter::new(Arc::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let registry = tracing_subscriber::registry().with(filter);
    if options.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(writer),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(log_path.is_none())
                    .with_writer(writer),
            )
            .try_init()?;
    }

    if let Some(level) = rejected {
        tracing::warn!(level = %level, "Unrecognized log level, using info");
    }
    Ok(())
}

/// Filter for a configured level. An unrecognized level yields `info` and
/// is handed back so the caller can warn once logging is up.
fn level_filter(level: &str) -> (EnvFilter, Option<String>) {
    match tracing_level(level).and_then(|directive| EnvFilter::try_new(directive).ok()) {
        Some(filter) => (filter, None),
        None => (EnvFilter::new("info"), Some(level.to_string())),
    }
}

/// Map a `log.level` value to a tracing filter directive.
///
/// Accepts the java.util.logging names the agent has always documented,
/// tracing's own level names, and `target=level` directives. A bare word
/// that is none of these would be read as a target name and silence every
/// other target, so it is rejected.
pub fn tracing_level(level: &str) -> Option<String> {
    let level = level.trim();
    let directive = match level.to_ascii_uppercase().as_str() {
        "OFF" => "off",
        "SEVERE" | "ERROR" => "error",
        "WARNING" | "WARN" => "warn",
        "INFO" => "info",
        "CONFIG" | "FINE" | "DEBUG" => "debug",
        "FINER" | "FINEST" | "ALL" | "TRACE" => "trace",
        _ if level.contains('=') => return Some(level.to_string()),
        _ => return None,
    };
    Some(directive.to_string())
}

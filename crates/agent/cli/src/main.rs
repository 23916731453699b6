//! agent-config - validate and inspect JVM metrics agent configuration
//!
//! This CLI lets operators:
//! - Check that a configuration file loads and validates
//! - See which properties a given metric resolves to
//! - Dump the effective settings and matcher list

use agent_config::{load_file, ResolvedConfiguration};
use agent_types::ObjectName;
use anyhow::Context as _;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

mod logging;
mod output;

use logging::LogOptions;
use output::OutputFormat;

/// agent-config CLI application
#[derive(Parser)]
#[command(name = "agent-config")]
#[command(about = "Validate and inspect JVM metrics agent configuration", long_about = None)]
#[command(version)]
struct Cli {
    /// Log filter (SEVERE..FINEST or a tracing directive)
    #[arg(long, global = true, env = "AGENT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Load and validate a configuration file
    Check {
        /// Configuration file
        file: PathBuf,
    },

    /// Print the properties resolved for one metric
    Resolve {
        /// Configuration file
        file: PathBuf,

        /// Object name, e.g. `java.lang:type=Memory`
        #[arg(short, long)]
        object_name: String,

        /// Attribute name
        #[arg(short, long, default_value = "")]
        attribute: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Print the resolved settings and matchers as JSON
    Dump {
        /// Configuration file
        file: PathBuf,
    },
}

impl Commands {
    fn file(&self) -> &Path {
        match self {
            Self::Check { file } | Self::Resolve { file, .. } | Self::Dump { file } => file,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let path = cli.command.file().to_path_buf();

    // Load before installing the subscriber: log.level and log.path live in the file
    let loaded = load_file(&path);

    let options = LogOptions {
        level: cli.log_level.clone(),
        json: cli.log_json,
    };
    logging::init(&options, loaded.as_ref().ok().map(|c| c.settings()))?;

    let config = loaded.with_context(|| format!("Invalid configuration {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        matchers = config.matchers().len(),
        "Configuration loaded"
    );

    run(cli.command, &config)
}

fn run(command: Commands, config: &ResolvedConfiguration) -> anyhow::Result<()> {
    match command {
        Commands::Check { .. } => {
            output::print_summary(config);
            Ok(())
        }
        Commands::Resolve {
            object_name,
            attribute,
            output: format,
            ..
        } => {
            let name = ObjectName::parse(&object_name)
                .with_context(|| format!("Invalid object name '{}'", object_name))?;
            let view = config.resolve_metric(&name, &attribute);
            if view.is_excluded() {
                tracing::info!(object_name = %name, attribute = %attribute, "Metric is excluded");
            }

            output::print_resolved(&output::redacted(view.properties()), format)
        }
        Commands::Dump { .. } => output::print_json(&output::Dump::new(config)),
    }
}

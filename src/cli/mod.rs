//! Command-line interface for yaml-tmpl.
//!
//! # Commands
//!
//! - `render` - Expand a template document and print the result
//!
//! # Global Options
//!
//! All commands support these global options:
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress all output except errors
//! - `--config` - Path to a configuration file (also `YAML_TMPL_CONFIG`)
//!
//! # Example
//!
//! ```bash
//! # Expand a template with one extra variable
//! yaml-tmpl render deploy.yaml --var replicas=3
//!
//! # Read from stdin and write JSON to a file
//! cat deploy.yaml | yaml-tmpl render - --format json -o deploy.json
//! ```

mod render;

pub use render::RenderCommand;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::CONFIG_ENV;

/// Settings derived from the global flags and shared by every command.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter for the subscriber; `None` disables logging.
    ///
    /// A `RUST_LOG` value in the environment takes precedence over this level.
    pub log_level: Option<String>,

    /// Explicit configuration file. `None` uses `~/.yaml-tmpl/config.toml` if it exists.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// Only the first call in a process has any effect.
    pub fn init_logging(&self) {
        let Some(level) = &self.log_level else {
            return;
        };

        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(level)
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Top-level command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "yaml-tmpl",
    about = "Expand parametrized YAML templates",
    version,
    long_about = "yaml-tmpl expands YAML documents containing Tera templates and the `_range` / \
                  `_with_items` directives into fully-resolved YAML or JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, env = CONFIG_ENV, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Expand a template document
    Render(RenderCommand),
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None // No logging when quiet
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Render(cmd) => cmd.execute(&config),
        }
    }
}

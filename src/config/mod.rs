//! Configuration for yaml-tmpl.
//!
//! The optional configuration file supplies default template variables and output settings.
//! It lives at `~/.yaml-tmpl/config.toml` unless `--config` (or `YAML_TMPL_CONFIG`) names
//! another file.
//!
//! # File Format
//!
//! ```toml
//! [vars]
//! env = "prod"
//!
//! [vars.db]
//! host = "db.internal"
//! port = 5432
//!
//! [output]
//! format = "json"
//! ```
//!
//! Nested tables under `[vars]` become dotted variables, so the example binds `db.host` and
//! `db.port`. See [`Variables`] for how the different variable sources are layered.

mod vars;

pub use vars::{Variables, parse_assignment};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::TmplError;
use crate::document::{Node, OutputFormat};

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV: &str = "YAML_TMPL_CONFIG";

/// Settings loaded from the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Variables bound before any template is rendered
    pub vars: toml::Table,

    /// Output settings
    pub output: OutputConfig,
}

/// The `[output]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Format used when `--format` is not given
    pub format: OutputFormat,
}

impl RenderConfig {
    /// Load configuration from `path`, or from the default location when `path` is `None`.
    ///
    /// A missing default file is not an error and yields [`RenderConfig::default`]; a missing
    /// file that was named explicitly is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TmplError::FileSystemError {
            operation: "read configuration".to_string(),
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| TmplError::ConfigError {
                message: e.to_string(),
            })
            .with_context(|| format!("Failed to parse configuration from {}", path.display()))?;

        tracing::debug!(
            "Loaded configuration from {} ({} top-level variable(s))",
            path.display(),
            config.vars.len()
        );
        Ok(config)
    }

    /// `~/.yaml-tmpl/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?;
        Ok(home.join(".yaml-tmpl").join("config.toml"))
    }

    /// The `[vars]` table as a document node.
    pub fn vars_node(&self) -> Result<Node, TmplError> {
        serde_yaml::to_value(&self.vars).map_err(|e| TmplError::ConfigError {
            message: format!("Unsupported value in [vars]: {e}"),
        })
    }
}

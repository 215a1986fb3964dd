//! Document decoding and encoding.
//!
//! Templates are YAML documents decoded into [`Node`], the `serde_yaml` value tree. Mapping
//! order is preserved by the decoder, which matters both for directive detection and for the
//! order in which sibling templates are rendered. YAML merge keys (`<<: *anchor`) are resolved
//! while loading so the parser never sees them.

use std::io::Read;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::TmplError;

/// A node of the document tree.
///
/// The parser accepts strings, numbers, sequences and mappings; every other variant is
/// rejected during expansion.
pub type Node = serde_yaml::Value;

/// Ordered mapping node.
pub type Mapping = serde_yaml::Mapping;

/// Serialization format for rendered documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Decode a YAML document, resolving merge keys.
pub fn from_str(content: &str) -> Result<Node, TmplError> {
    let mut node: Node = serde_yaml::from_str(content).map_err(|e| TmplError::DocumentParseError {
        file: "<input>".to_string(),
        reason: e.to_string(),
    })?;
    node.apply_merge().map_err(|e| TmplError::DocumentParseError {
        file: "<input>".to_string(),
        reason: e.to_string(),
    })?;
    Ok(node)
}

/// Read and decode a YAML document from disk.
pub fn from_path(path: &Path) -> Result<Node, TmplError> {
    let content = std::fs::read_to_string(path).map_err(|e| TmplError::FileSystemError {
        operation: "read template".to_string(),
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    from_str(&content).map_err(|e| match e {
        TmplError::DocumentParseError {
            reason, ..
        } => TmplError::DocumentParseError {
            file: path.display().to_string(),
            reason,
        },
        other => other,
    })
}

/// Decode a YAML document from any reader (used for stdin).
pub fn from_reader(mut reader: impl Read) -> Result<Node, TmplError> {
    let mut content = String::new();
    reader.read_to_string(&mut content).map_err(|e| TmplError::FileSystemError {
        operation: "read template".to_string(),
        path: "<stdin>".to_string(),
        reason: e.to_string(),
    })?;
    from_str(&content)
}

/// Encode a rendered document.
pub fn to_string(node: &Node, format: OutputFormat) -> Result<String, TmplError> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(node).map_err(|e| TmplError::OutputError {
            format,
            reason: e.to_string(),
        }),
        OutputFormat::Json => serde_json::to_string_pretty(node)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| TmplError::OutputError {
                format,
                reason: e.to_string(),
            }),
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

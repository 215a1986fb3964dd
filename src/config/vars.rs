//! Layered template variables.
//!
//! Variables come from three places, applied in this order so later sources win:
//!
//! 1. the `[vars]` table of the configuration file
//! 2. a YAML `--vars-file`
//! 3. individual `--var KEY=VALUE` arguments
//!
//! Nested mappings are flattened into dotted paths before binding, so `{db: {port: 5432}}`
//! binds `db.port`. Everything is bound in the root scope of the namespace.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::TmplError;
use crate::document::{self, Mapping, Node};
use crate::namespace::ScopedNamespace;
use crate::parser::describe;

/// Ordered list of dotted bindings waiting to be seeded into a namespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    bindings: Vec<(String, Node)>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every leaf of `mapping`, flattening nested string-keyed mappings.
    pub fn add_mapping(&mut self, mapping: &Mapping) -> Result<(), TmplError> {
        flatten_into("", mapping, &mut self.bindings)
    }

    /// Add the mapping stored in a YAML variables file.
    pub fn add_file(&mut self, path: &Path) -> Result<()> {
        let node = document::from_path(path)?;
        let Node::Mapping(mapping) = node else {
            return Err(TmplError::InvalidVariablesFile {
                file: path.display().to_string(),
            }
            .into());
        };
        self.add_mapping(&mapping)
            .with_context(|| format!("Failed to load variables from {}", path.display()))
    }

    /// Add a single `KEY=VALUE` assignment.
    pub fn add_assignment(&mut self, assignment: &str) -> Result<(), TmplError> {
        let (path, value) = parse_assignment(assignment)?;
        self.bindings.push((path, value));
        Ok(())
    }

    pub fn bindings(&self) -> &[(String, Node)] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bind everything into the current scope of `context`, in insertion order.
    pub fn seed(&self, context: &mut ScopedNamespace) {
        for (path, value) in &self.bindings {
            tracing::trace!("Seeding variable {}", path);
            context.set(path, value.clone());
        }
        tracing::debug!("Seeded {} variable(s)", self.bindings.len());
    }
}

/// Split `KEY=VALUE`, decoding the value as a YAML scalar.
///
/// Numbers and booleans keep their type (`replicas=3` binds the number 3). Empty values,
/// nulls, and anything that decodes to a list or mapping are kept as the literal text.
pub fn parse_assignment(assignment: &str) -> Result<(String, Node), TmplError> {
    let invalid = || TmplError::InvalidVariable {
        assignment: assignment.to_string(),
    };

    let (key, raw) = assignment.split_once('=').ok_or_else(invalid)?;
    let key = key.trim();
    if key.is_empty() || key.split('.').any(str::is_empty) {
        return Err(invalid());
    }

    let value = match serde_yaml::from_str::<Node>(raw) {
        Ok(scalar @ (Node::Bool(_) | Node::Number(_) | Node::String(_))) => scalar,
        _ => Node::String(raw.to_string()),
    };
    Ok((key.to_string(), value))
}

fn flatten_into(
    prefix: &str,
    mapping: &Mapping,
    out: &mut Vec<(String, Node)>,
) -> Result<(), TmplError> {
    for (key, value) in mapping {
        let name = match key {
            Node::String(name) => name.clone(),
            Node::Number(number) => number.to_string(),
            other => {
                return Err(TmplError::ConfigError {
                    message: format!(
                        "Variable names must be strings or numbers, found {}",
                        describe(other)
                    ),
                });
            }
        };
        let path = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}.{name}")
        };

        match value {
            Node::Mapping(nested) if !nested.is_empty() => flatten_into(&path, nested, out)?,
            leaf => out.push((path, leaf.clone())),
        }
    }
    Ok(())
}

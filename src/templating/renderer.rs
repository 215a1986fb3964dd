//! Template rendering engine with Tera.
//!
//! This module provides the [`TemplateRenderer`] struct that renders template strings against a
//! [`ScopedNamespace`] in a sandboxed Tera instance and turns Tera failures into structured
//! [`TemplateError`]s.

use std::collections::HashMap;

use regex::Regex;
use strsim::levenshtein;
use tera::{Context as TeraContext, Tera};

use super::TemplateEngine;
use super::error::TemplateError;
use crate::document::Node;
use crate::namespace::{SEPARATOR, ScopedNamespace};

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Marker carried by errors from functions the sandbox replaces.
const SANDBOX_DENIED: &str = "disabled in sandboxed templates";

/// Tera global functions that would expose the host and are replaced by a failing stub.
const DENIED_FUNCTIONS: &[&str] = &["get_env"];

/// Sandboxed Tera renderer.
///
/// # Security
///
/// Template text may come from untrusted configuration, so rendering is restricted:
/// - No templates are registered, so `include`, `extends` and `import` cannot reach the file
///   system
/// - `get_env` is replaced and always fails, so the process environment is not readable
/// - The namespace is only read; rendering never writes variables back
#[derive(Debug, Clone, Default)]
pub struct TemplateRenderer {
    _private: (),
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `template` with the visible bindings of `context` as variables.
    ///
    /// Strings without any template delimiters are returned unchanged without building a
    /// context.
    pub fn render_str(
        &self,
        template: &str,
        context: &ScopedNamespace,
    ) -> Result<String, TemplateError> {
        if !has_template_syntax(template) {
            return Ok(template.to_string());
        }

        let tera_context =
            TeraContext::from_serialize(context).map_err(|e| TemplateError::InvalidContext {
                message: Self::format_tera_error(&e),
            })?;

        // Fresh instance per render: nothing registered, nothing shared
        let mut tera = Tera::default();
        for name in DENIED_FUNCTIONS {
            tera.register_function(name, denied_function);
        }

        let rendered = tera
            .render_str(template, &tera_context)
            .map_err(|e| Self::parse_tera_error(&e, template, context))?;

        tracing::trace!("Rendered template {:?} -> {:?}", template, rendered);
        Ok(rendered)
    }

    /// Parse a Tera error into a structured [`TemplateError`].
    fn parse_tera_error(
        error: &tera::Error,
        template: &str,
        context: &ScopedNamespace,
    ) -> TemplateError {
        let message = Self::format_tera_error(error);

        if message.contains(SANDBOX_DENIED) {
            return TemplateError::Forbidden {
                message,
            };
        }

        if let Some(variable) = Self::extract_variable_name(&message) {
            let available = Self::available_variables(context);
            let suggestions = Self::find_similar_variables(&variable, &available);
            return TemplateError::VariableNotFound {
                variable,
                suggestions,
                template: template.to_string(),
            };
        }

        TemplateError::SyntaxError {
            message,
            template: template.to_string(),
            line: Self::extract_line_from_tera_error(error),
        }
    }

    /// Extract variable name from "Variable `foo` not found" message
    fn extract_variable_name(error_msg: &str) -> Option<String> {
        let re = Regex::new(r"Variable `([^`]+)` not found").ok()?;
        re.captures(error_msg).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string())
    }

    /// Every visible dotted path plus each of its ancestor prefixes.
    fn available_variables(context: &ScopedNamespace) -> Vec<String> {
        let mut vars: Vec<String> = Vec::new();
        for path in context.visible_paths() {
            for (idx, _) in path.match_indices(SEPARATOR) {
                vars.push(path[..idx].to_string());
            }
            vars.push(path.to_string());
        }
        vars.sort();
        vars.dedup();
        vars
    }

    /// Find similar variable names using Levenshtein distance
    fn find_similar_variables(target: &str, available: &[String]) -> Vec<String> {
        let mut scored: Vec<_> =
            available.iter().map(|var| (var.clone(), levenshtein(target, var))).collect();

        // Closest first
        scored.sort_by_key(|(_, dist)| *dist);

        scored
            .into_iter()
            .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .take(3)
            .map(|(var, _)| var)
            .collect()
    }

    /// Extract line number from Tera error message
    ///
    /// Tera includes line:column information in parse error messages, e.g. "1:7".
    fn extract_line_from_tera_error(error: &tera::Error) -> Option<usize> {
        let error_msg = format!("{error:?}");
        let re = Regex::new(r"(\d+):(\d+)").ok()?;
        re.captures(&error_msg)
            .and_then(|caps| caps.get(1))
            .and_then(|line| line.as_str().parse::<usize>().ok())
    }

    /// Flatten a Tera error chain into one readable message.
    ///
    /// Internal one-off template names are stripped and the generic "failed to render"
    /// wrappers are dropped so only the root causes remain.
    pub fn format_tera_error(error: &tera::Error) -> String {
        use std::error::Error;

        let mut all_messages = vec![error.to_string()];
        let mut current_error: Option<&dyn Error> = error.source();
        while let Some(err) = current_error {
            all_messages.push(err.to_string());
            current_error = err.source();
        }

        let messages: Vec<String> = all_messages
            .into_iter()
            .map(|msg| {
                msg.replace("while rendering '__tera_one_off'", "")
                    .replace("Failed to render '__tera_one_off'", "Template rendering failed")
                    .replace("Failed to parse '__tera_one_off'", "Template syntax error")
                    .replace("'__tera_one_off'", "template")
                    .trim()
                    .to_string()
            })
            .filter(|msg| {
                !msg.is_empty() && msg != "Template rendering failed" && msg != "Template syntax error"
            })
            .collect();

        if messages.is_empty() {
            "Template syntax error".to_string()
        } else {
            messages.join("\n  → ")
        }
    }
}

impl TemplateEngine for TemplateRenderer {
    fn render(&self, template: &str, context: &ScopedNamespace) -> Result<Node, TemplateError> {
        self.render_str(template, context).map(Node::String)
    }
}

fn has_template_syntax(template: &str) -> bool {
    template.contains("{{") || template.contains("{%") || template.contains("{#")
}

fn denied_function(_args: &HashMap<String, tera::Value>) -> tera::Result<tera::Value> {
    Err(tera::Error::msg(format!("host access is {SANDBOX_DENIED}")))
}

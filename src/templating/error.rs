//! Template error types
//!
//! Tera reports failures as a chain of loosely structured messages. The renderer folds that
//! chain into one of the variants below so callers can tell a missing variable apart from a
//! syntax problem, and so the CLI can print a focused message with suggestions.

use thiserror::Error;

/// Structured template rendering failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template referenced a variable the namespace does not bind
    #[error("Template variable not found: '{variable}'")]
    VariableNotFound {
        /// Dotted name as written in the template
        variable: String,
        /// Similarly named variables that are bound
        suggestions: Vec<String>,
        /// The template text being rendered
        template: String,
    },

    /// The template could not be parsed or evaluated
    #[error("Template syntax error: {message}")]
    SyntaxError {
        /// Cleaned-up Tera message
        message: String,
        /// The template text being rendered
        template: String,
        /// 1-indexed line reported by Tera, when available
        line: Option<usize>,
    },

    /// The template tried to reach host resources the sandbox withholds
    #[error("Template attempted a forbidden operation: {message}")]
    Forbidden {
        /// Cleaned-up Tera message
        message: String,
    },

    /// The namespace could not be turned into a template context
    #[error("Failed to build template context: {message}")]
    InvalidContext {
        /// Serializer message
        message: String,
    },
}

impl TemplateError {
    /// Multi-line description with the offending template and hints.
    pub fn format_with_context(&self) -> String {
        match self {
            TemplateError::VariableNotFound {
                variable,
                suggestions,
                template,
            } => {
                let mut msg = String::new();
                msg.push_str("ERROR: Template Variable Not Found\n\n");
                msg.push_str(&format!("Variable: {variable}\n"));
                msg.push_str(&format!("Template: {}\n\n", excerpt(template, None)));
                if !suggestions.is_empty() {
                    msg.push_str("Did you mean one of these?\n");
                    for suggestion in suggestions {
                        msg.push_str(&format!("  - {suggestion}\n"));
                    }
                    msg.push('\n');
                }
                msg
            }
            TemplateError::SyntaxError {
                message,
                template,
                line,
            } => {
                let mut msg = String::new();
                msg.push_str("ERROR: Template Syntax Error\n\n");
                msg.push_str(&format!("Error: {message}\n"));
                if let Some(line) = line {
                    msg.push_str(&format!("Line: {line}\n"));
                }
                msg.push_str(&format!("Template: {}\n\n", excerpt(template, *line)));
                msg.push_str("Common issues:\n");
                msg.push_str("  - Unclosed {{ }} or {% %} delimiters\n");
                msg.push_str("  - Invalid filter names\n");
                msg.push_str("  - Missing quotes around string values\n\n");
                msg
            }
            TemplateError::Forbidden {
                message,
            } => format!("ERROR: Forbidden Template Operation\n\nError: {message}\n\n"),
            TemplateError::InvalidContext {
                message,
            } => format!("ERROR: Invalid Template Context\n\nError: {message}\n\n"),
        }
    }
}

/// Show a single template line, truncated for long values.
fn excerpt(template: &str, line: Option<usize>) -> String {
    let text = line
        .and_then(|line| template.lines().nth(line.saturating_sub(1)))
        .unwrap_or(template);
    if text.chars().count() > 80 {
        let truncated: String = text.chars().take(77).collect();
        format!("{truncated:?}...")
    } else {
        format!("{text:?}")
    }
}

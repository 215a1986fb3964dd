//! Error handling for yaml-tmpl
//!
//! The library reports failures through strongly-typed enums, one per layer:
//! - [`NamespaceError`](crate::namespace::NamespaceError) for namespace mutation
//! - [`TemplateError`](crate::templating::TemplateError) for template rendering
//! - [`ParseError`](crate::parser::ParseError) for document expansion
//! - [`TmplError`] for everything around the core: files, decoding, configuration, output
//!
//! The command-line layer works with [`anyhow::Error`] and converts whatever reaches the top
//! into an [`ErrorContext`] through [`user_friendly_error`], which attaches details and an
//! actionable suggestion before printing.
//!
//! # Examples
//!
//! ```rust,no_run
//! use yaml_tmpl::core::{TmplError, user_friendly_error};
//!
//! let error = TmplError::InvalidVariable {
//!     assignment: "no-equals-sign".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Coloured output on stderr
//! ```

use std::fmt;

use colored::Colorize;
use thiserror::Error;

use crate::document::OutputFormat;
use crate::parser::ParseError;
use crate::templating::TemplateError;

/// Errors raised by the layer around the expansion core.
#[derive(Error, Debug, Clone)]
pub enum TmplError {
    /// Reading or writing a file failed
    #[error("Failed to {operation}: {path}")]
    FileSystemError {
        /// What was being attempted (e.g. "read template")
        operation: String,
        /// The path involved
        path: String,
        /// Underlying I/O message
        reason: String,
    },

    /// The input document is not valid YAML
    #[error("Invalid YAML document in {file}: {reason}")]
    DocumentParseError {
        /// Source of the document
        file: String,
        /// Decoder message
        reason: String,
    },

    /// The configuration file could not be read or decoded
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// A `--var` argument is not of the form `KEY=VALUE`
    #[error("Invalid variable assignment '{assignment}': expected KEY=VALUE")]
    InvalidVariable {
        /// The raw argument
        assignment: String,
    },

    /// A variables file does not contain a mapping at its root
    #[error("Variables file {file} must contain a mapping at the top level")]
    InvalidVariablesFile {
        /// The offending file
        file: String,
    },

    /// Encoding the rendered document failed
    #[error("Failed to encode output as {format}: {reason}")]
    OutputError {
        /// Requested format
        format: OutputFormat,
        /// Encoder message
        reason: String,
    },
}

/// An error paired with optional details and a suggestion for the user.
#[derive(Debug)]
pub struct ErrorContext {
    /// Headline message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colours.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`].
///
/// Walks the `anyhow` chain looking for the crate's error types; the outermost context message
/// is kept as the headline so file names added with `.with_context(..)` are not lost.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let headline = error.to_string();

    for cause in error.chain() {
        if let Some(parse_error) = cause.downcast_ref::<ParseError>() {
            return parse_error_context(headline, parse_error);
        }
        if let Some(template_error) = cause.downcast_ref::<TemplateError>() {
            return template_error_context(headline, template_error);
        }
        if let Some(tmpl_error) = cause.downcast_ref::<TmplError>() {
            return tmpl_error_context(headline, tmpl_error);
        }
    }

    let mut ctx = ErrorContext::new(headline);
    if let Some(root) = error.chain().skip(1).last() {
        ctx = ctx.with_details(root.to_string());
    }
    ctx
}

fn with_cause(headline: String, cause: &dyn std::error::Error) -> ErrorContext {
    let cause = cause.to_string();
    if headline == cause {
        ErrorContext::new(headline)
    } else {
        ErrorContext::new(headline).with_details(cause)
    }
}

fn parse_error_context(headline: String, error: &ParseError) -> ErrorContext {
    match error {
        ParseError::Template(template_error) => template_error_context(headline, template_error),
        ParseError::UnsupportedValue {
            ..
        } => with_cause(headline, error).with_suggestion(
            "Only strings, numbers, lists and mappings can be expanded; quote booleans and nulls (e.g. 'true', '')",
        ),
        ParseError::InvalidDirectiveArgument {
            directive, ..
        } => with_cause(headline, error).with_suggestion(format!(
            "`{directive}` expects 1 to 3 integer arguments (start, stop, step) with a non-zero step"
        )),
    }
}

fn template_error_context(headline: String, error: &TemplateError) -> ErrorContext {
    let ctx = with_cause(headline, error);
    match error {
        TemplateError::VariableNotFound {
            suggestions, ..
        } if !suggestions.is_empty() => {
            ctx.with_suggestion(format!("Did you mean: {}?", suggestions.join(", ")))
        }
        TemplateError::VariableNotFound {
            ..
        } => ctx.with_suggestion("Define the variable with --var KEY=VALUE, --vars-file or the [vars] config table"),
        TemplateError::SyntaxError {
            ..
        } => ctx.with_suggestion("Check template syntax for unclosed {{ }} or {% %} delimiters"),
        TemplateError::Forbidden {
            ..
        } => ctx.with_suggestion("Pass host values in explicitly with --var instead"),
        TemplateError::InvalidContext {
            ..
        } => ctx,
    }
}

fn tmpl_error_context(headline: String, error: &TmplError) -> ErrorContext {
    let ctx = with_cause(headline, error);
    match error {
        TmplError::FileSystemError {
            reason, ..
        } => ctx
            .with_details(reason.clone())
            .with_suggestion("Check that the file exists and is readable"),
        TmplError::DocumentParseError {
            ..
        } => ctx.with_suggestion("Check the YAML syntax of the template document"),
        TmplError::ConfigError {
            ..
        } => ctx.with_suggestion(
            "Fix the configuration file or point --config / YAML_TMPL_CONFIG at another one",
        ),
        TmplError::InvalidVariable {
            ..
        } => ctx.with_suggestion("Use --var name=value, e.g. --var replicas=3 or --var db.host=localhost"),
        TmplError::InvalidVariablesFile {
            ..
        } => ctx.with_suggestion("Wrap the variables in a top-level mapping such as `vars: {...}`"),
        TmplError::OutputError {
            ..
        } => ctx.with_suggestion("Mappings with non-string keys cannot be written as JSON; try --format yaml"),
    }
}

//! Errors raised while expanding a document.

use thiserror::Error;

use crate::templating::TemplateError;

/// Failure of a single parse; every variant aborts the whole expansion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A node is not a string, number, sequence or mapping
    #[error("Unable to parse {value}: only strings, numbers, sequences and mappings are supported")]
    UnsupportedValue {
        /// Rendering of the offending node
        value: String,
    },

    /// A directive argument could not be used
    #[error("Invalid `{directive}` argument: {reason}")]
    InvalidDirectiveArgument {
        /// Directive key, e.g. `_range`
        directive: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// Template rendering failed; passed through untouched
    #[error(transparent)]
    Template(#[from] TemplateError),
}

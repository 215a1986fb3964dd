//! Template string rendering.
//!
//! Scalar strings in a document are rendered with [Tera](https://keats.github.io/tera/)
//! against the current [`ScopedNamespace`]. Dotted bindings appear as nested objects, so a
//! namespace holding `db.host` and `db.port` renders `{{ db.host }}:{{ db.port }}`.
//!
//! # Supported Features
//!
//! - Variable substitution: `{{ item }}`, `{{ db.host }}`
//! - Conditional logic: `{% if env == "prod" %}...{% endif %}`
//! - Loops: `{% for host in hosts %}{{ host }},{% endfor %}`
//! - Standard Tera filters (`upper`, `default`, `join`, ...)
//!
//! # Syntax Restrictions
//!
//! Templates may come from untrusted configuration, so the renderer runs sandboxed:
//! - `{% include %}`, `{% extends %}` and `{% import %}` have no templates to resolve
//! - `get_env()` is disabled
//!
//! Undefined variables are errors rather than empty strings.

pub mod error;
pub mod renderer;

pub use error::TemplateError;
pub use renderer::TemplateRenderer;

use crate::document::Node;
use crate::namespace::ScopedNamespace;

/// Renders template strings for the parser.
///
/// The parser only decides when to render and against which namespace; implementations decide
/// what the template language is. Implementations must treat the namespace as read-only.
pub trait TemplateEngine {
    /// Render `template` using the visible bindings of `context`.
    ///
    /// The result is usually a string node but may be any node.
    fn render(&self, template: &str, context: &ScopedNamespace) -> Result<Node, TemplateError>;
}

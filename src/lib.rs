//! yaml-tmpl - parametrized YAML configuration templates
//!
//! Expands YAML documents whose string scalars are [Tera](https://keats.github.io/tera/)
//! templates and whose mappings may carry two structural directives, producing a fully
//! resolved document.
//!
//! # Architecture Overview
//!
//! - A document is decoded into a [`Node`] tree with mapping order preserved.
//! - [`Parser`] walks the tree depth-first. Strings are rendered against a
//!   [`ScopedNamespace`], numbers pass through, sequences and mappings recurse.
//! - `_range` turns a mapping into a list of integers; `_with_items` repeats the rest of its
//!   mapping once per item, binding `item` in a fresh scope.
//! - Directive results inside a sequence are spliced into it, so lists can be built from
//!   literal entries and generated ones side by side.
//!
//! # Core Modules
//!
//! - [`namespace`] - Dotted-path variable stores with nested views and lexical scopes
//! - [`templating`] - Sandboxed Tera rendering of template strings
//! - [`parser`] - Recursive expansion and the `_range` / `_with_items` directives
//! - [`document`] - YAML decoding and YAML/JSON encoding
//!
//! # Supporting Modules
//!
//! - [`config`] - `~/.yaml-tmpl/config.toml` and layered variable sources
//! - [`core`] - Error types and user-facing error reporting
//! - [`cli`] - The `yaml-tmpl` command line
//!
//! # Example
//!
//! ```rust
//! use yaml_tmpl::{Parser, ScopedNamespace, document};
//!
//! let template = document::from_str(
//!     r#"
//! web:
//!   _with_items: [1, 2]
//!   name: "web-{{ item }}.{{ domain }}"
//! ports:
//!   - 22
//!   - _range: [8000, 8002]
//! "#,
//! )?;
//!
//! let mut context = ScopedNamespace::new();
//! context.set("domain", "example.com");
//!
//! let rendered = Parser::new().parse_with(&template, &mut context)?;
//! assert_eq!(rendered["web"][1]["name"].as_str(), Some("web-2.example.com"));
//! assert_eq!(rendered["ports"], document::from_str("[22, 8000, 8001]")?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Command Line
//!
//! ```bash
//! yaml-tmpl render deploy.yaml --var domain=example.com
//! yaml-tmpl render - --vars-file prod.yaml --format json < deploy.yaml
//! ```

// Expansion core
pub mod document;
pub mod namespace;
pub mod parser;
pub mod templating;

// Supporting modules
pub mod cli;
pub mod config;
pub mod core;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use crate::core::{ErrorContext, TmplError};
pub use crate::document::{Node, OutputFormat};
pub use crate::namespace::{Namespace, NamespaceError, ScopedNamespace};
pub use crate::parser::{ParseError, Parser};
pub use crate::templating::{TemplateEngine, TemplateError, TemplateRenderer};

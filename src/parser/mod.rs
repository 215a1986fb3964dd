//! Recursive document expansion.
//!
//! [`Parser`] walks a document tree depth-first and produces its rendered form:
//!
//! | Node      | Result                                                             |
//! |-----------|--------------------------------------------------------------------|
//! | string    | rendered through the [`TemplateEngine`] against the namespace      |
//! | number    | returned unchanged                                                 |
//! | sequence  | each element parsed; directive expansions are spliced in place     |
//! | mapping   | `_range` or `_with_items` directive, otherwise keys and values parsed |
//! | other     | [`ParseError::UnsupportedValue`]                                   |
//!
//! # Directives
//!
//! ```yaml
//! ports:
//!   - 80
//!   - _range: [8000, 8003]      # spliced: [80, 8000, 8001, 8002]
//! users:
//!   _with_items: [alice, bob]
//!   name: "{{ item }}"          # [{name: alice}, {name: bob}]
//! ```
//!
//! A directive only splices when it is an element of a sequence; used as a mapping value it
//! produces a list-valued field.

mod directives;
mod error;


pub use directives::{ITEM_VARIABLE, RANGE_KEY, WITH_ITEMS_KEY};
pub use error::ParseError;

use crate::document::{Mapping, Node};
use crate::namespace::ScopedNamespace;
use crate::templating::{TemplateEngine, TemplateRenderer};

/// Document expander.
///
/// The parser holds no per-document state; variables live in the [`ScopedNamespace`] passed to
/// [`parse_with`](Parser::parse_with), so one parser can expand any number of documents.
#[derive(Debug, Clone, Default)]
pub struct Parser<E = TemplateRenderer> {
    engine: E,
}

impl Parser<TemplateRenderer> {
    /// Parser backed by the sandboxed Tera renderer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: TemplateEngine> Parser<E> {
    /// Parser backed by a custom template engine.
    pub fn with_renderer(engine: E) -> Self {
        Self {
            engine,
        }
    }

    /// Expand `node` against a fresh, empty namespace.
    pub fn parse(&self, node: &Node) -> Result<Node, ParseError> {
        let mut context = ScopedNamespace::new();
        self.parse_with(node, &mut context)
    }

    /// Expand `node` against a caller-supplied namespace.
    ///
    /// Directives open and close scopes on `context` while they run; bindings the caller made
    /// beforehand are visible to every template.
    pub fn parse_with(&self, node: &Node, context: &mut ScopedNamespace) -> Result<Node, ParseError> {
        tracing::trace!("Parsing {} at scope {}", describe(node), context.scope_level());
        match node {
            Node::String(template) => Ok(self.engine.render(template, context)?),
            Node::Number(_) => Ok(node.clone()),
            Node::Sequence(items) => self.parse_sequence(items, context).map(Node::Sequence),
            Node::Mapping(mapping) => self.parse_mapping(mapping, context),
            other => Err(ParseError::UnsupportedValue {
                value: describe(other),
            }),
        }
    }

    /// Parse each element, splicing sequence results of mapping elements into the output.
    fn parse_sequence(
        &self,
        items: &[Node],
        context: &mut ScopedNamespace,
    ) -> Result<Vec<Node>, ParseError> {
        let mut parsed = Vec::with_capacity(items.len());
        for item in items {
            let extendable = item.is_mapping();
            match self.parse_with(item, context)? {
                Node::Sequence(expanded) if extendable => parsed.extend(expanded),
                other => parsed.push(other),
            }
        }
        Ok(parsed)
    }

    fn parse_mapping(
        &self,
        mapping: &Mapping,
        context: &mut ScopedNamespace,
    ) -> Result<Node, ParseError> {
        if let Some(args) = mapping.get(RANGE_KEY) {
            return self.expand_range(args, context);
        }
        if let Some(args) = mapping.get(WITH_ITEMS_KEY) {
            return self.expand_with_items(args, mapping, context);
        }
        self.parse_entries(mapping.iter(), context).map(Node::Mapping)
    }

    /// Parse keys and values in order; a later key rendering to the same value wins.
    fn parse_entries<'n>(
        &self,
        entries: impl IntoIterator<Item = (&'n Node, &'n Node)>,
        context: &mut ScopedNamespace,
    ) -> Result<Mapping, ParseError> {
        let mut parsed = Mapping::new();
        for (key, value) in entries {
            let key = self.parse_with(key, context)?;
            let value = self.parse_with(value, context)?;
            parsed.insert(key, value);
        }
        Ok(parsed)
    }
}

/// Short human-readable rendering of a node for error messages.
pub(crate) fn describe(node: &Node) -> String {
    match node {
        Node::Null => "null".to_string(),
        Node::Bool(value) => format!("boolean {value}"),
        Node::Number(value) => format!("number {value}"),
        Node::String(value) => format!("string {value:?}"),
        Node::Sequence(items) => format!("sequence of {} item(s)", items.len()),
        Node::Mapping(mapping) => format!("mapping of {} entry(ies)", mapping.len()),
        Node::Tagged(tagged) => format!("tagged value {}", tagged.tag),
    }
}

//! Structural directives: `_range` and `_with_items`.

use super::{ParseError, Parser, describe};
use crate::document::{Mapping, Node};
use crate::namespace::ScopedNamespace;
use crate::templating::TemplateEngine;

/// Generates a list of integers; takes precedence over every other key in its mapping.
pub const RANGE_KEY: &str = "_range";

/// Repeats the rest of its mapping once per item.
pub const WITH_ITEMS_KEY: &str = "_with_items";

/// Variable bound to the current item inside a `_with_items` block.
pub const ITEM_VARIABLE: &str = "item";

impl<E: TemplateEngine> Parser<E> {
    /// `_range: stop | [stop] | [start, stop] | [start, stop, step]`
    pub(super) fn expand_range(
        &self,
        args: &Node,
        context: &mut ScopedNamespace,
    ) -> Result<Node, ParseError> {
        let args: Vec<&Node> = match args {
            Node::Sequence(items) => items.iter().collect(),
            scalar => vec![scalar],
        };

        let mut bounds = Vec::with_capacity(args.len());
        for arg in args {
            let parsed = self.parse_with(arg, context)?;
            bounds.push(coerce_int(&parsed)?);
        }

        let (start, stop, step) = match bounds.as_slice() {
            [stop] => (0, *stop, 1),
            [start, stop] => (*start, *stop, 1),
            [start, stop, step] => (*start, *stop, *step),
            other => {
                return Err(invalid_range(format!(
                    "expected 1 to 3 arguments, got {}",
                    other.len()
                )));
            }
        };
        if step == 0 {
            return Err(invalid_range("step must not be zero".to_string()));
        }

        let values = int_range(start, stop, step);
        tracing::debug!(
            "Expanded {}({}, {}, {}) into {} value(s)",
            RANGE_KEY,
            start,
            stop,
            step,
            values.len()
        );
        Ok(Node::Sequence(values.into_iter().map(Node::from).collect()))
    }

    /// Parse the rest of `mapping` once per item with `item` bound in a fresh scope.
    pub(super) fn expand_with_items(
        &self,
        args: &Node,
        mapping: &Mapping,
        context: &mut ScopedNamespace,
    ) -> Result<Node, ParseError> {
        let args: Vec<&Node> = match args {
            Node::Sequence(items) => items.iter().collect(),
            scalar => vec![scalar],
        };

        // Each argument is one item, even when it expands to a list
        let mut items = Vec::with_capacity(args.len());
        for arg in args {
            items.push(self.parse_with(arg, context)?);
        }

        let body: Vec<(&Node, &Node)> = mapping
            .iter()
            .filter(|(key, _)| key.as_str() != Some(WITH_ITEMS_KEY))
            .collect();

        let level = context.open_scope();
        tracing::debug!(
            "Expanding {} over {} item(s) in scope {}",
            WITH_ITEMS_KEY,
            items.len(),
            level
        );

        let expanded = items
            .into_iter()
            .map(|item| {
                context.set(ITEM_VARIABLE, item);
                self.parse_entries(body.iter().copied(), context).map(Node::Mapping)
            })
            .collect::<Result<Vec<_>, _>>();

        // Closed on failure too so the caller's namespace stays balanced
        context.close_scope();
        expanded.map(Node::Sequence)
    }
}

fn invalid_range(reason: String) -> ParseError {
    ParseError::InvalidDirectiveArgument {
        directive: RANGE_KEY,
        reason,
    }
}

/// Integer coercion for range bounds: integers, truncated finite floats, integer strings.
fn coerce_int(node: &Node) -> Result<i64, ParseError> {
    match node {
        Node::Number(number) => {
            if let Some(value) = number.as_i64() {
                return Ok(value);
            }
            match number.as_f64() {
                Some(value)
                    if value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64 =>
                {
                    Ok(value.trunc() as i64)
                }
                _ => Err(invalid_range(format!("{number} is out of integer range"))),
            }
        }
        Node::String(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid_range(format!("{text:?} is not an integer"))),
        other => Err(invalid_range(format!("{} is not an integer", describe(other)))),
    }
}

/// Half-open integer range with a non-zero step, in either direction.
fn int_range(start: i64, stop: i64, step: i64) -> Vec<i64> {
    let mut values = Vec::new();
    let mut current = start;
    while (step > 0 && current < stop) || (step < 0 && current > stop) {
        values.push(current);
        match current.checked_add(step) {
            Some(next) => current = next,
            None => break,
        }
    }
    values
}

//! Namespace with lexically scoped bindings.

use serde::{Serialize, Serializer};

use super::view::{self, Bindings, BindingsMut, Lookup, View, ViewMut};
use super::{NamespaceError, Store};
use crate::document::Node;

/// One binding of a key, tagged with the scope level it was written at.
#[derive(Debug, Clone, PartialEq)]
struct ScopedBinding {
    value: Node,
    level: usize,
}

/// Namespace whose bindings are tied to the scope they were written in.
///
/// Every key holds a stack of bindings ordered by scope level. Writing inside a nested scope
/// shadows the outer binding instead of mutating it; closing the scope drops every binding
/// written at that level, which makes the outer binding visible again.
///
/// Stale bindings are pruned eagerly when a scope closes, so reads never observe a value from a
/// closed scope even when a later scope reuses the same level number.
///
/// # Examples
///
/// ```rust
/// use yaml_tmpl::namespace::ScopedNamespace;
///
/// let mut ns = ScopedNamespace::new();
/// ns.open_scope();
/// ns.set("item", 1);
/// ns.open_scope();
/// ns.set("item", 2);
/// assert_eq!(ns.get("item").value().and_then(|v| v.as_i64()), Some(2));
/// ns.close_scope();
/// assert_eq!(ns.get("item").value().and_then(|v| v.as_i64()), Some(1));
/// ns.close_scope();
/// assert!(ns.get("item").is_unbound());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScopedNamespace {
    store: Store<Vec<ScopedBinding>>,
    scope_level: usize,
}

impl ScopedNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scope level; `0` is the root scope.
    pub fn scope_level(&self) -> usize {
        self.scope_level
    }

    /// Enter a nested scope and return its level.
    pub fn open_scope(&mut self) -> usize {
        self.scope_level += 1;
        tracing::trace!("Opened scope {}", self.scope_level);
        self.scope_level
    }

    /// Leave the current scope, discarding every binding written inside it.
    ///
    /// Closing the root scope is clamped: it logs a warning and changes nothing.
    pub fn close_scope(&mut self) {
        if self.scope_level == 0 {
            tracing::warn!("close_scope called at the root scope; ignoring");
            return;
        }

        let closing = self.scope_level;
        let mut emptied = Vec::new();
        for (key, stack) in self.store.iter_mut() {
            stack.retain(|binding| binding.level < closing);
            if stack.is_empty() {
                emptied.push(key.to_string());
            }
        }
        for key in &emptied {
            if let Err(err) = self.store.remove(key) {
                tracing::error!("Failed to release '{}' when closing scope {}: {}", key, closing, err);
                debug_assert!(false, "emptied key '{key}' missing from the store");
            }
        }

        self.scope_level -= 1;
        tracing::trace!(
            "Closed scope {} ({} binding(s) released)",
            closing,
            emptied.len()
        );
    }

    /// Read a dotted path; see [`Namespace::get`](super::Namespace::get).
    pub fn get(&self, path: &str) -> Lookup<'_, Self> {
        view::resolve(self, path)
    }

    /// Bind `value` at the current scope level.
    ///
    /// A binding already written at this level is replaced; bindings from enclosing scopes are
    /// shadowed until this scope closes.
    pub fn set(&mut self, path: &str, value: impl Into<Node>) {
        let binding = ScopedBinding {
            value: value.into(),
            level: self.scope_level,
        };
        let level = self.scope_level;
        match self.store.get_mut(path) {
            Some(stack) => {
                stack.retain(|existing| existing.level < level);
                stack.push(binding);
            }
            None => {
                self.store.insert(path, vec![binding]);
            }
        }
    }

    /// Pop every binding of `path` written at `level` or deeper (default: the current level).
    ///
    /// When the stack empties the key itself is removed from the store.
    pub fn delete(&mut self, path: &str, level: Option<usize>) -> Result<(), NamespaceError> {
        let level = level.unwrap_or(self.scope_level);
        let stack = self.store.get_mut(path).ok_or_else(|| NamespaceError::KeyNotFound {
            path: path.to_string(),
        })?;

        while stack.last().is_some_and(|binding| binding.level >= level) {
            stack.pop();
        }
        if stack.is_empty() {
            self.store.remove(path)?;
        }
        Ok(())
    }

    pub fn view(&self, path: &str) -> View<'_, Self> {
        View::new(self, path)
    }

    pub fn view_mut(&mut self, path: &str) -> ViewMut<'_, Self> {
        ViewMut::new(self, path)
    }

    /// Stored keys, in path order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.store.keys()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn ref_count(&self, prefix: &str) -> usize {
        self.store.ref_count(prefix)
    }

    /// Paths whose binding is currently visible, in path order.
    pub fn visible_paths(&self) -> impl Iterator<Item = &str> {
        self.store
            .iter()
            .filter(|(path, _)| self.leaf(path).is_some())
            .map(|(path, _)| path)
    }
}

impl Bindings for ScopedNamespace {
    fn leaf(&self, path: &str) -> Option<&Node> {
        self.store
            .get(path)?
            .iter()
            .rev()
            .find(|binding| binding.level <= self.scope_level)
            .map(|binding| &binding.value)
    }

    fn is_branch(&self, path: &str) -> bool {
        self.store.is_branch(path)
    }

    fn stored_keys(&self) -> impl Iterator<Item = &str> {
        self.store.keys()
    }

    fn stored_len(&self) -> usize {
        self.store.len()
    }
}

impl BindingsMut for ScopedNamespace {
    fn bind(&mut self, path: &str, value: Node) {
        self.set(path, value);
    }

    fn unbind(&mut self, path: &str) -> Result<(), NamespaceError> {
        self.delete(path, None)
    }
}

impl Serialize for ScopedNamespace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        view::visible_tree(self, "").serialize(serializer)
    }
}

//! Hierarchical variable namespaces addressed by dotted paths.
//!
//! Bindings live in a flat [`Store`] keyed by the full dotted path (`"db.port"`), while
//! per-prefix reference counts make every prefix with live descendants behave like a nested
//! container. Reading a path that is unset, or that has descendants, yields a [`View`] rooted at
//! that path rather than an error, so `ns.get("db")` followed by `.get("port")` works without any
//! container ever being allocated.
//!
//! Two flavours share this machinery:
//!
//! - [`Namespace`]: plain leaf bindings.
//! - [`ScopedNamespace`]: each key holds a stack of bindings tagged with the scope level they
//!   were written at, so bindings made inside a closed scope disappear while outer ones
//!   reappear.
//!
//! # Examples
//!
//! ```rust
//! use yaml_tmpl::namespace::Namespace;
//!
//! let mut ns = Namespace::new();
//! ns.set("a.b", 1);
//!
//! let a = ns.get("a");
//! let view = a.view().unwrap();
//! assert_eq!(view.get("b").value().and_then(|v| v.as_i64()), Some(1));
//!
//! // Unset paths never fail
//! assert!(ns.get("nope.nothing").is_unbound());
//! ```

mod scoped;
mod store;
mod view;

pub use scoped::ScopedNamespace;
pub use store::{SEPARATOR, Store};
pub use view::{Bindings, BindingsMut, Lookup, View, ViewMut};

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::document::Node;

/// Errors raised by namespace mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    /// Deleting a path that holds no binding.
    #[error("Key not found in namespace: '{path}'")]
    KeyNotFound {
        /// The fully-qualified dotted path
        path: String,
    },
}

/// Flat dotted-path variable store.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    store: Store<Node>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a dotted path.
    ///
    /// Returns the leaf when one is stored and nothing lives beneath it, otherwise a view
    /// rooted at `path`. Absent paths produce an unbound view.
    pub fn get(&self, path: &str) -> Lookup<'_, Self> {
        view::resolve(self, path)
    }

    /// Bind a leaf at a dotted path.
    pub fn set(&mut self, path: &str, value: impl Into<Node>) {
        self.store.insert(path, value.into());
    }

    /// Remove the leaf at `path`, returning it.
    pub fn delete(&mut self, path: &str) -> Result<Node, NamespaceError> {
        self.store.remove(path)
    }

    /// Read-only view rooted at `path` (the root for `""`).
    pub fn view(&self, path: &str) -> View<'_, Self> {
        View::new(self, path)
    }

    /// Mutable view rooted at `path`; writes land in this namespace's store.
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

    /// Number of stored keys beneath `prefix`.
    pub fn ref_count(&self, prefix: &str) -> usize {
        self.store.ref_count(prefix)
    }
}

impl Bindings for Namespace {
    fn leaf(&self, path: &str) -> Option<&Node> {
        self.store.get(path)
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

impl BindingsMut for Namespace {
    fn bind(&mut self, path: &str, value: Node) {
        self.set(path, value);
    }

    fn unbind(&mut self, path: &str) -> Result<(), NamespaceError> {
        self.delete(path).map(|_| ())
    }
}

impl Serialize for Namespace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        view::visible_tree(self, "").serialize(serializer)
    }
}

//! Prefix views over a namespace.
//!
//! A view is a borrowed namespace plus a dotted prefix. It never copies bindings: reads go
//! straight to the backing [`Store`](super::Store) and writes through a [`ViewMut`] land in the
//! same store, so `ns.view_mut("a").set("b", 1)` and `ns.set("a.b", 1)` are the same operation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use super::NamespaceError;
use super::store::SEPARATOR;
use crate::document::Node;

/// Read access shared by [`Namespace`](super::Namespace) and
/// [`ScopedNamespace`](super::ScopedNamespace).
pub trait Bindings {
    /// The currently visible leaf stored at the fully-qualified `path`, if any.
    fn leaf(&self, path: &str) -> Option<&Node>;

    /// Whether `path` has live descendants.
    fn is_branch(&self, path: &str) -> bool;

    /// Every stored key of the backing store, regardless of prefix.
    fn stored_keys(&self) -> impl Iterator<Item = &str>;

    /// Number of stored keys in the backing store.
    fn stored_len(&self) -> usize;
}

/// Write access shared by both namespace flavours.
pub trait BindingsMut: Bindings {
    fn bind(&mut self, path: &str, value: Node);

    fn unbind(&mut self, path: &str) -> Result<(), NamespaceError>;
}

/// Result of reading a dotted path.
pub enum Lookup<'a, N: ?Sized> {
    /// A stored leaf with no live descendants.
    Value(&'a Node),
    /// Anything else: a branch, or an unset path.
    Branch(View<'a, N>),
}

impl<'a, N: Bindings + ?Sized> Lookup<'a, N> {
    pub fn value(&self) -> Option<&'a Node> {
        match self {
            Lookup::Value(value) => Some(*value),
            Lookup::Branch(_) => None,
        }
    }

    pub fn view(&self) -> Option<&View<'a, N>> {
        match self {
            Lookup::Value(_) => None,
            Lookup::Branch(view) => Some(view),
        }
    }

    /// True for a branch view with nothing bound beneath it.
    pub fn is_unbound(&self) -> bool {
        matches!(self, Lookup::Branch(view) if view.is_unbound())
    }
}

impl<N: ?Sized> fmt::Debug for Lookup<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Lookup::Branch(view) => f.debug_tuple("Branch").field(view).finish(),
        }
    }
}

pub(crate) fn qualify(prefix: &str, path: &str) -> String {
    format!("{prefix}{path}")
}

pub(crate) fn branch_prefix(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("{path}{SEPARATOR}")
    }
}

/// Resolve a fully-qualified path: a leaf wins only while nothing is stored beneath it.
pub(crate) fn resolve<'a, N: Bindings + ?Sized>(ns: &'a N, path: &str) -> Lookup<'a, N> {
    if !ns.is_branch(path) {
        if let Some(value) = ns.leaf(path) {
            return Lookup::Value(value);
        }
    }
    Lookup::Branch(View::new(ns, path))
}

/// Read-only handle rooted at a dotted prefix.
pub struct View<'a, N: ?Sized> {
    ns: &'a N,
    prefix: String,
}

impl<N: ?Sized> Clone for View<'_, N> {
    fn clone(&self) -> Self {
        Self {
            ns: self.ns,
            prefix: self.prefix.clone(),
        }
    }
}

impl<N: ?Sized> fmt::Debug for View<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View").field("prefix", &self.prefix).finish()
    }
}

impl<'a, N: Bindings + ?Sized> View<'a, N> {
    pub(crate) fn new(ns: &'a N, path: &str) -> Self {
        Self {
            ns,
            prefix: branch_prefix(path),
        }
    }

    /// The prefix this view addresses, including the trailing separator (empty at the root).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn get(&self, path: &str) -> Lookup<'a, N> {
        resolve(self.ns, &qualify(&self.prefix, path))
    }

    /// True when nothing is bound beneath this view's prefix.
    pub fn is_unbound(&self) -> bool {
        match self.prefix.strip_suffix(SEPARATOR) {
            Some(path) => !self.ns.is_branch(path),
            None => self.ns.stored_len() == 0,
        }
    }

    /// Stored keys of the whole backing store; the prefix does not filter them.
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + use<'a, N> {
        self.ns.stored_keys()
    }

    /// Count of the whole backing store.
    pub fn len(&self) -> usize {
        self.ns.stored_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<N: Bindings + ?Sized> Serialize for View<'_, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        visible_tree(self.ns, &self.prefix).serialize(serializer)
    }
}

/// Mutable handle rooted at a dotted prefix.
pub struct ViewMut<'a, N: ?Sized> {
    ns: &'a mut N,
    prefix: String,
}

impl<N: ?Sized> fmt::Debug for ViewMut<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewMut").field("prefix", &self.prefix).finish()
    }
}

impl<'a, N: BindingsMut + ?Sized> ViewMut<'a, N> {
    pub(crate) fn new(ns: &'a mut N, path: &str) -> Self {
        Self {
            ns,
            prefix: branch_prefix(path),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn get(&self, path: &str) -> Lookup<'_, N> {
        resolve(&*self.ns, &qualify(&self.prefix, path))
    }

    pub fn set(&mut self, path: &str, value: impl Into<Node>) {
        let path = qualify(&self.prefix, path);
        self.ns.bind(&path, value.into());
    }

    pub fn delete(&mut self, path: &str) -> Result<(), NamespaceError> {
        let path = qualify(&self.prefix, path);
        self.ns.unbind(&path)
    }

    /// Narrow this view further; the child still writes into the same store.
    pub fn view_mut(&mut self, path: &str) -> ViewMut<'_, N> {
        let path = qualify(&self.prefix, path);
        ViewMut::new(&mut *self.ns, &path)
    }

    pub fn len(&self) -> usize {
        self.ns.stored_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Nested rendering of the visible bindings, used as the template context.
pub(crate) enum Tree<'a> {
    Leaf(&'a Node),
    Branch(BTreeMap<&'a str, Tree<'a>>),
}

impl Serialize for Tree<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Tree::Leaf(node) => node.serialize(serializer),
            Tree::Branch(children) => serializer.collect_map(children.iter()),
        }
    }
}

fn insert_path<'a>(children: &mut BTreeMap<&'a str, Tree<'a>>, segments: &[&'a str], leaf: &'a Node) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        // A branch at the same path shadows the leaf
        children.entry(*first).or_insert(Tree::Leaf(leaf));
        return;
    }

    let slot = children.entry(*first).or_insert_with(|| Tree::Branch(BTreeMap::new()));
    if matches!(slot, Tree::Leaf(_)) {
        *slot = Tree::Branch(BTreeMap::new());
    }
    if let Tree::Branch(grandchildren) = slot {
        insert_path(grandchildren, rest, leaf);
    }
}

/// Build the nested tree of every visible binding beneath `prefix`.
pub(crate) fn visible_tree<'a, N: Bindings + ?Sized>(ns: &'a N, prefix: &str) -> Tree<'a> {
    let mut root = BTreeMap::new();
    for key in ns.stored_keys() {
        let Some(relative) = key.strip_prefix(prefix) else {
            continue;
        };
        let Some(leaf) = ns.leaf(key) else {
            continue;
        };
        let segments: Vec<&str> = relative.split(SEPARATOR).collect();
        insert_path(&mut root, &segments, leaf);
    }
    Tree::Branch(root)
}

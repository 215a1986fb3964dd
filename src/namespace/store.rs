//! Flat backing store shared by every view of a namespace.
//!
//! Keys are fully-qualified dotted paths. Alongside the entries the store keeps, for every
//! dotted prefix, the number of stored keys that have that prefix as a proper ancestor. A
//! prefix with a non-zero count is an addressable branch.

use std::collections::{BTreeMap, HashMap};

use super::NamespaceError;

/// Path segment separator.
pub const SEPARATOR: char = '.';

/// Iterate the proper ancestor prefixes of a dotted path, shortest first.
///
/// `"a.b.c"` yields `"a"` then `"a.b"`.
pub(crate) fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices(SEPARATOR).map(move |(idx, _)| &path[..idx])
}

/// Arena holding the bindings and ancestor reference counts of one namespace tree.
#[derive(Debug, Clone)]
pub struct Store<B> {
    entries: BTreeMap<String, B>,
    ref_count: HashMap<String, usize>,
}

impl<B> Default for Store<B> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            ref_count: HashMap::new(),
        }
    }
}

impl<B> Store<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&B> {
        self.entries.get(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut B> {
        self.entries.get_mut(path)
    }

    /// Store a binding, returning the one it replaced.
    ///
    /// Ancestor counts only move when the path was previously absent. Writing a leaf over a
    /// branch leaves the descendants stored and counted.
    pub fn insert(&mut self, path: &str, binding: B) -> Option<B> {
        if let Some(slot) = self.entries.get_mut(path) {
            return Some(std::mem::replace(slot, binding));
        }

        for ancestor in ancestors(path) {
            *self.ref_count.entry(ancestor.to_string()).or_insert(0) += 1;
        }
        self.entries.insert(path.to_string(), binding);
        None
    }

    /// Remove a binding and release one reference on each of its ancestors.
    pub fn remove(&mut self, path: &str) -> Result<B, NamespaceError> {
        let binding = self.entries.remove(path).ok_or_else(|| NamespaceError::KeyNotFound {
            path: path.to_string(),
        })?;

        for ancestor in ancestors(path) {
            let count = self.ref_count.get_mut(ancestor);
            match count {
                Some(count) if *count > 0 => {
                    *count -= 1;
                    if *count == 0 {
                        self.ref_count.remove(ancestor);
                    }
                }
                _ => panic!("namespace ref count underflow for prefix '{ancestor}' (removing '{path}')"),
            }
        }

        Ok(binding)
    }

    /// Number of stored keys below `prefix`.
    pub fn ref_count(&self, prefix: &str) -> usize {
        self.ref_count.get(prefix).copied().unwrap_or(0)
    }

    /// Whether `prefix` currently has live descendants.
    pub fn is_branch(&self, prefix: &str) -> bool {
        self.ref_count(prefix) > 0
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &B)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut B)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

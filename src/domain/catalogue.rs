//! Transform catalogue seam.
//!
//! The catalogue owns the live transform of every bone identifier. The tree
//! asks it once per node, at creation, and keeps only the returned handle.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// Resolves a bone identifier to a handle on its shared transform.
pub trait TransformCatalogue {
    type Handle;

    fn resolve(&self, identifier: &str) -> Option<Self::Handle>;
}

impl<F, H> TransformCatalogue for F
where
    F: Fn(&str) -> Option<H>,
{
    type Handle = H;

    fn resolve(&self, identifier: &str) -> Option<H> {
        self(identifier)
    }
}

/// Shared registry of transforms keyed by bone identifier.
///
/// Entries are reference counted; trees receive `Weak` handles so dropping
/// an entry here never leaves a tree owning it.
#[derive(Debug)]
pub struct NodeCatalogue<T> {
    entries: HashMap<String, Arc<T>>,
}

impl<T> Default for NodeCatalogue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NodeCatalogue<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers `value` for `identifier`, replacing any previous entry.
    pub fn insert(&mut self, identifier: impl Into<String>, value: T) -> Arc<T> {
        let entry = Arc::new(value);
        self.entries.insert(identifier.into(), Arc::clone(&entry));
        entry
    }

    /// Returns the existing entry, or registers the value built by `make`.
    pub fn find_or_add(&mut self, identifier: &str, make: impl FnOnce() -> T) -> Arc<T> {
        Arc::clone(
            self.entries
                .entry(identifier.to_string())
                .or_insert_with(|| Arc::new(make())),
        )
    }

    pub fn find(&self, identifier: &str) -> Option<Arc<T>> {
        self.entries.get(identifier).cloned()
    }

    pub fn remove(&mut self, identifier: &str) -> Option<Arc<T>> {
        self.entries.remove(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> TransformCatalogue for NodeCatalogue<T> {
    type Handle = Weak<T>;

    fn resolve(&self, identifier: &str) -> Option<Weak<T>> {
        self.entries.get(identifier).map(Arc::downgrade)
    }
}

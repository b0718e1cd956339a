//! Per-feed record of already-notified deal identifiers.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;

/// Grow-only set of deal identifiers.
///
/// Identifiers are never removed while the process runs; this is what keeps a
/// deal from being announced twice.
#[derive(Debug, Clone)]
pub struct SeenSet<K> {
    ids: HashSet<K>,
}

impl<K: Eq + Hash> SeenSet<K> {
    pub fn new() -> Self {
        Self { ids: HashSet::new() }
    }

    /// Check whether an identifier has been recorded.
    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.ids.contains(id)
    }

    /// Record an identifier. Returns true only if it was not seen before.
    pub fn insert(&mut self, id: K) -> bool {
        self.ids.insert(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<K: Eq + Hash> Default for SeenSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

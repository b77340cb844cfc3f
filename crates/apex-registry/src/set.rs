//! A set with case-folded identity, built on [`CaseFoldingRegistry`].

use std::fmt;

use crate::fold::FoldKey;
use crate::registry::CaseFoldingRegistry;

/// A set of keys compared by their folded form.
///
/// Inserting `"bar"` into a set that already holds `"Bar"` is a no-op and the
/// set keeps displaying `"Bar"`.
#[derive(Clone)]
pub struct CaseFoldingSet<K: FoldKey> {
    inner: CaseFoldingRegistry<K, ()>,
}

impl<K: FoldKey> CaseFoldingSet<K> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            inner: CaseFoldingRegistry::new(),
        }
    }

    /// Insert `value`, returning `true` if its identity was not present.
    pub fn insert(&mut self, value: K) -> bool {
        if self.inner.has(&value) {
            return false;
        }
        self.inner.set(value, ());
        true
    }

    /// Membership test under any casing.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        Q: FoldKey<Folded = K::Folded> + ?Sized,
    {
        self.inner.has(value)
    }

    /// Remove `value`'s identity, returning `true` if it was present.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        Q: FoldKey<Folded = K::Folded> + ?Sized,
    {
        self.inner.delete(value).is_some()
    }

    /// Number of distinct identities.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Remove every value.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Display forms in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        self.inner.keys()
    }
}

impl<K: FoldKey> Default for CaseFoldingSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: FoldKey + fmt::Debug> fmt::Debug for CaseFoldingSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: FoldKey> FromIterator<K> for CaseFoldingSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K: FoldKey> Extend<K> for CaseFoldingSet<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

//! The case-folding map.
//!
//! [`CaseFoldingRegistry`] composes two maps keyed by the folded identity of
//! a key: one holding values, one holding the display key. A third vector
//! records identities in insertion order, which is the iteration order of
//! every accessor.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use crate::fold::FoldKey;

/// A map whose keys are compared by their folded form.
///
/// The first key inserted for an identity becomes its display form and is
/// never replaced by later `set` calls with different casing.
///
/// ```
/// use apex_registry::CaseFoldingRegistry;
///
/// let mut types = CaseFoldingRegistry::new();
/// types.set("ApexClass".to_string(), 1);
/// types.set("APEXCLASS".to_string(), 2);
///
/// assert_eq!(types.get("apexclass"), Some(&2));
/// assert_eq!(types.keys().collect::<Vec<_>>(), vec!["ApexClass"]);
/// ```
#[derive(Clone)]
pub struct CaseFoldingRegistry<K: FoldKey, V> {
    values: HashMap<K::Folded, V>,
    display: HashMap<K::Folded, K>,
    order: Vec<K::Folded>,
}

impl<K: FoldKey, V> CaseFoldingRegistry<K, V> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            display: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Number of distinct identities stored.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Store `value` under the folded identity of `key`.
    ///
    /// `key` becomes the display form only if the identity is new. Returns
    /// the value previously stored for the identity, if any.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let folded = key.fold();
        if !self.display.contains_key(&folded) {
            self.order.push(folded.clone());
            self.display.insert(folded.clone(), key);
        }
        self.values.insert(folded, value)
    }

    /// Look up the value stored for `key` under any casing.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: FoldKey<Folded = K::Folded> + ?Sized,
    {
        self.values.get(&key.fold())
    }

    /// Mutable lookup under any casing.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: FoldKey<Folded = K::Folded> + ?Sized,
    {
        self.values.get_mut(&key.fold())
    }

    /// Returns the value for `key`, inserting the result of `default` first
    /// if the identity is absent.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        match self.values.entry(key.fold()) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => {
                self.order.push(slot.key().clone());
                self.display.insert(slot.key().clone(), key);
                slot.insert(default())
            }
        }
    }

    /// Existence test under any casing.
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        Q: FoldKey<Folded = K::Folded> + ?Sized,
    {
        self.values.contains_key(&key.fold())
    }

    /// Remove the entry for `key`'s identity, returning its value.
    ///
    /// The display form goes with it: re-inserting the identity later records
    /// the new casing.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: FoldKey<Folded = K::Folded> + ?Sized,
    {
        let folded = key.fold();
        let removed = self.values.remove(&folded)?;
        self.display.remove(&folded);
        self.order.retain(|existing| existing != &folded);
        Some(removed)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.values.clear();
        self.display.clear();
        self.order.clear();
    }

    /// Display keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.order.iter().filter_map(|folded| self.display.get(folded))
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.order.iter().filter_map(|folded| self.values.get(folded))
    }

    /// `(display key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.order.iter().filter_map(|folded| {
            let key = self.display.get(folded)?;
            let value = self.values.get(folded)?;
            Some((key, value))
        })
    }
}

impl<K: FoldKey, V> Default for CaseFoldingRegistry<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for CaseFoldingRegistry<K, V>
where
    K: FoldKey + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: FoldKey, V> FromIterator<(K, V)> for CaseFoldingRegistry<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.extend(iter);
        registry
    }
}

impl<K: FoldKey, V> Extend<(K, V)> for CaseFoldingRegistry<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

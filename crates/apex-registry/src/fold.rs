//! Key folding and case-insensitive ordering.
//!
//! Only string keys are folded. Every other key type folds to itself, so
//! integer or boolean keys keep plain equality semantics.

use std::cmp::Ordering;
use std::hash::Hash;

/// A key that can be normalized for identity comparison.
///
/// Two keys denote the same entity when their folded forms are equal. The
/// folded form is what registries hash on; the original key is kept only
/// for display.
pub trait FoldKey {
    /// The normalized identity of the key.
    type Folded: Eq + Hash + Clone;

    /// Produce the folded identity of this key.
    fn fold(&self) -> Self::Folded;
}

impl FoldKey for str {
    type Folded = String;

    fn fold(&self) -> String {
        self.to_lowercase()
    }
}

impl FoldKey for String {
    type Folded = String;

    fn fold(&self) -> String {
        self.as_str().fold()
    }
}

impl<T: FoldKey + ?Sized> FoldKey for &T {
    type Folded = T::Folded;

    fn fold(&self) -> T::Folded {
        (**self).fold()
    }
}

macro_rules! identity_fold {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FoldKey for $ty {
                type Folded = $ty;

                fn fold(&self) -> $ty {
                    *self
                }
            }
        )*
    };
}

identity_fold!(bool, char, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// Compare two strings case-insensitively, without locale rules.
///
/// Strings are ordered by their lowercase forms. Strings that only differ in
/// case are tie-broken by their raw bytes so the result is a total order and
/// sorting is deterministic.
///
/// ```
/// use std::cmp::Ordering;
/// use apex_registry::compare_folded;
///
/// assert_eq!(compare_folded("apple", "Banana"), Ordering::Less);
/// assert_eq!(compare_folded("Zed", "alpha"), Ordering::Greater);
/// ```
pub fn compare_folded(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sort a slice of strings in place using [`compare_folded`].
pub fn sort_folded<S: AsRef<str>>(items: &mut [S]) {
    items.sort_by(|a, b| compare_folded(a.as_ref(), b.as_ref()));
}

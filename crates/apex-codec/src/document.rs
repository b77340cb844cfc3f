//! Typed intermediate representation of a manifest.

use serde::{Deserialize, Serialize};

/// A decoded `package.xml` document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDocument {
    /// The root `<version>` field, if present. The merge never reads it.
    pub version: Option<String>,
    /// `<types>` blocks in document order.
    pub types: Vec<TypeBlock>,
}

impl PackageDocument {
    /// `(type name, members)` pairs in document order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.types
            .iter()
            .map(|block| (block.name.as_str(), block.members.as_slice()))
    }

    /// Total number of member fields across all blocks.
    pub fn member_count(&self) -> usize {
        self.types.iter().map(|block| block.members.len()).sum()
    }
}

/// One `<types>` block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeBlock {
    /// Trimmed `<name>` text; empty when the field is missing.
    pub name: String,
    /// Trimmed, non-empty `<members>` texts in document order.
    pub members: Vec<String>,
}

impl TypeBlock {
    /// A block is usable when it has a name and at least one member.
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() || self.members.is_empty()
    }
}

/// A repeatable field seen zero, one, or many times.
///
/// Manifests written by hand frequently carry a single `<members>` where
/// tools expect a list. Fields are accumulated here and flattened with
/// [`OneOrMany::into_list`], so a lone value and a list of one are the same
/// thing by construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OneOrMany<T> {
    #[default]
    Absent,
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Record another occurrence of the field.
    pub fn push(&mut self, value: T) {
        *self = match std::mem::take(self) {
            OneOrMany::Absent => OneOrMany::One(value),
            OneOrMany::One(first) => OneOrMany::Many(vec![first, value]),
            OneOrMany::Many(mut values) => {
                values.push(value);
                OneOrMany::Many(values)
            }
        };
    }

    /// Number of occurrences recorded.
    pub fn len(&self) -> usize {
        match self {
            OneOrMany::Absent => 0,
            OneOrMany::One(_) => 1,
            OneOrMany::Many(values) => values.len(),
        }
    }

    /// Returns `true` if the field never appeared.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coerce into a list: absent is empty, a scalar is a list of one.
    pub fn into_list(self) -> Vec<T> {
        match self {
            OneOrMany::Absent => Vec::new(),
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

//! Member sets with wildcard absorption.

use apex_registry::{sort_folded, CaseFoldingSet};

/// The member that stands for every component of a type.
pub const WILDCARD: &str = "*";

/// The members of one metadata type.
///
/// Members are identified case-insensitively. Once the set holds
/// [`WILDCARD`] it holds nothing else: concrete members inserted afterwards
/// are ignored, and inserting the wildcard into a set of concrete members
/// replaces them.
#[derive(Clone, Debug, Default)]
pub struct MemberSet {
    members: CaseFoldingSet<String>,
}

impl MemberSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an already trimmed, non-empty member.
    ///
    /// Returns `true` if the set changed.
    pub fn insert(&mut self, member: &str) -> bool {
        if self.is_wildcard() {
            return false;
        }
        if member == WILDCARD {
            self.members.clear();
            self.members.insert(WILDCARD.to_string());
            return true;
        }
        self.members.insert(member.to_string())
    }

    /// Returns `true` if the set is the wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.members.contains(WILDCARD)
    }

    /// Membership test under any casing.
    pub fn contains(&self, member: &str) -> bool {
        self.members.contains(member)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in insertion order, first-seen casing.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.iter().map(String::as_str)
    }

    /// Members as they are rendered: `["*"]` for the wildcard, otherwise
    /// sorted case-insensitively.
    pub fn sorted(&self) -> Vec<String> {
        if self.is_wildcard() {
            return vec![WILDCARD.to_string()];
        }
        let mut members: Vec<String> = self.members.iter().cloned().collect();
        sort_folded(&mut members);
        members
    }
}

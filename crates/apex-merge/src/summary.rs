//! Serializable summary of a merged model.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A read-only view of a merged model, suitable for display or JSON output.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSummary {
    /// Manifests merged so far, in merge order.
    pub sources: Vec<PathBuf>,
    /// Non-empty types, sorted case-insensitively.
    pub categories: Vec<CategorySummary>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub name: String,
    pub count: usize,
    pub members: Vec<String>,
}

impl MergeSummary {
    /// Members across all types, counting a wildcard as one.
    pub fn total_members(&self) -> usize {
        self.categories.iter().map(|category| category.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

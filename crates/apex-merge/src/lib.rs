//! Merge engine for Salesforce `package.xml` manifests.
//!
//! Folds any number of manifests into one canonical manifest: type names and
//! members are identified case-insensitively (first-seen casing wins), the
//! `*` wildcard absorbs every concrete member of its type, and output is
//! sorted so the same content always renders the same bytes.
//!
//! # Key Types
//!
//! - [`MergeEngine`] -- Accumulates entries and renders the merged manifest
//! - [`MemberSet`] -- Members of one type, with wildcard absorption
//! - [`DescriptorSource`] -- Where manifest text is read from ([`FsSource`], [`InMemorySource`])
//! - [`MergeSummary`] -- Serializable view of the merged model

pub mod engine;
pub mod error;
pub mod members;
pub mod source;
pub mod summary;

pub use engine::MergeEngine;
pub use error::{MergeError, MergeResult};
pub use members::{MemberSet, WILDCARD};
pub use source::{DescriptorSource, FsSource, InMemorySource};
pub use summary::{CategorySummary, MergeSummary};

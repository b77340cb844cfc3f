//! Case-insensitive registries for manifest names.
//!
//! Salesforce metadata type names and member names are compared without
//! regard to case, but the casing a user wrote first is the one that should
//! come back out. This crate provides the containers that implement that
//! rule for the merge engine.
//!
//! # Key Types
//!
//! - [`FoldKey`] -- How a key is normalized for identity comparison
//! - [`CaseFoldingRegistry`] -- Map keyed by folded identity, preserving first-seen display keys
//! - [`CaseFoldingSet`] -- Set with the same identity rule
//! - [`compare_folded`] -- Case-insensitive total ordering used for output sorting

pub mod fold;
pub mod registry;
pub mod set;

pub use fold::{compare_folded, sort_folded, FoldKey};
pub use registry::CaseFoldingRegistry;
pub use set::CaseFoldingSet;

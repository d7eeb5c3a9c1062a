//! Composite instance skeletons
//!
//! Merges the bone hierarchies of independently loaded sub-models into one
//! arena-backed forest per instance, keyed by bone identifier, with lookup,
//! descendant and path queries on the result.
//!
//! Layers, innermost first:
//! - [`domain`]: the forest, its merge and queries
//! - [`application`]: instance lifecycle and diagnostics
//! - [`infrastructure`]: hierarchy description files
//! - [`cli`]: the `skelmerge` inspection tool

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{NodeIndex, NodeTree, SkeletonNode, SourceNode, TransformCatalogue};

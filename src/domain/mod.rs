//! Domain layer: the merged skeleton forest and its queries
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod catalogue;
pub mod error;
pub mod iter;
pub mod node;
pub mod query;
pub mod source;
pub mod tree;

pub use catalogue::{NodeCatalogue, TransformCatalogue};
pub use error::{DomainError, DomainResult};
pub use iter::{PostOrderIterator, TreeIterator};
pub use node::{NodeIndex, SkeletonNode};
pub use query::Ancestors;
pub use source::{SourceBone, SourceNode};
pub use tree::NodeTree;

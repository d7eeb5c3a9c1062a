//! Infrastructure layer: hierarchy description files
//!
//! This layer reads constituent hierarchies from disk and hands them to the
//! application layer.

pub mod error;
pub mod hierarchy_file;

pub use error::{InfraError, InfraResult};
pub use hierarchy_file::{Constituent, HierarchyFile, Placement};

//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent structural violations of the merged skeleton.
///
/// The merge variants are distinguished for diagnostics only: every one of
/// them leaves the tree in an undefined state and the caller must rebuild.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("structural conflict at '{identifier}': already parented to '{existing_parent}', requested '{requested_parent}'")]
    StructuralConflict {
        identifier: String,
        existing_parent: String,
        requested_parent: String,
    },

    #[error("cycle rejected: attaching '{identifier}' under '{parent}' would make it its own ancestor")]
    CycleRejected { identifier: String, parent: String },

    #[error("no transform in catalogue for node: {0}")]
    MissingTransform(String),

    #[error("no path between '{start}' and '{end}': nodes are in different hierarchies")]
    Disconnected { start: String, end: String },

    #[error("tree invariant violated: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    /// True for the errors a rejected merge produces.
    pub fn is_merge_rejection(&self) -> bool {
        matches!(
            self,
            DomainError::StructuralConflict { .. }
                | DomainError::CycleRejected { .. }
                | DomainError::MissingTransform(_)
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

use std::fmt;

use generational_arena::Index;
use itertools::Itertools;

/// Stable handle to a node in a [`NodeTree`](crate::domain::NodeTree).
///
/// Nodes are never removed from a tree, so the handle stays valid for the
/// lifetime of the tree that produced it. Handles from another tree are a
/// programming error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIndex(pub(crate) Index);

impl NodeIndex {
    /// Dense insertion position of the node, in `0..node_count()`.
    pub fn position(self) -> usize {
        self.0.into_raw_parts().0
    }
}

impl PartialOrd for NodeIndex {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeIndex {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.position().cmp(&other.position())
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.position())
    }
}

/// One bone of the merged skeleton.
///
/// Fields are private: links are only ever changed by the merge, which keeps
/// parent and child lists consistent.
#[derive(Debug, Clone)]
pub struct SkeletonNode<H> {
    /// Name shared by every constituent that has this bone
    identifier: String,
    /// Non-owning handle to the externally owned transform
    transform: H,
    /// Index of parent node in the arena, None for root nodes
    parent: Option<NodeIndex>,
    /// Indices of child nodes in order of first discovery
    children: Vec<NodeIndex>,
}

impl<H> SkeletonNode<H> {
    pub(crate) fn new(identifier: String, transform: H, parent: Option<NodeIndex>) -> Self {
        Self {
            identifier,
            transform,
            parent,
            children: Vec::new(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Handle resolved from the transform catalogue when the node was created.
    pub fn transform(&self) -> &H {
        &self.transform
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn set_parent(&mut self, parent: NodeIndex) {
        self.parent = Some(parent);
    }

    pub(crate) fn push_child(&mut self, child: NodeIndex) {
        self.children.push(child);
    }
}

impl<H> fmt::Display for SkeletonNode<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parent = self
            .parent
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "SkeletonNode(identifier={};parent={};children({})=({}))",
            self.identifier,
            parent,
            self.children.len(),
            self.children.iter().join(";")
        )
    }
}

//! Merged skeleton forest: arena storage and the subtree merge.

use std::collections::HashMap;

use generational_arena::Arena;
use tracing::{debug, instrument, trace};

use crate::domain::catalogue::TransformCatalogue;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{NodeIndex, SkeletonNode};
use crate::domain::source::SourceNode;

/// Arena-based forest holding the merged bones of one composite instance.
///
/// Nodes are only ever appended, so every [`NodeIndex`] handed out stays
/// valid, and positions are dense and in insertion order. The identifier
/// lookup is kept in bijection with the arena.
#[derive(Debug)]
pub struct NodeTree<H> {
    /// Arena storage for all skeleton nodes
    arena: Arena<SkeletonNode<H>>,
    /// Identifier of every node to its index
    lookup: HashMap<String, NodeIndex>,
}

impl<H> Default for NodeTree<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> NodeTree<H> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            lookup: HashMap::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn node_index(&self, identifier: &str) -> Option<NodeIndex> {
        self.lookup.get(identifier).copied()
    }

    /// # Panics
    /// If `index` does not belong to this tree.
    pub fn node(&self, index: NodeIndex) -> &SkeletonNode<H> {
        &self.arena[index.0]
    }

    pub(crate) fn check_index(&self, index: NodeIndex) {
        assert!(
            self.arena.contains(index.0),
            "node index {index} does not belong to this tree"
        );
    }

    /// Index of the node at insertion `position`, if in range.
    pub fn index_at(&self, position: usize) -> Option<NodeIndex> {
        self.arena
            .get_unknown_gen(position)
            .map(|(_, index)| NodeIndex(index))
    }

    pub fn root_count(&self) -> usize {
        let roots = self.arena.iter().filter(|(_, node)| node.is_root()).count();
        debug_assert!(roots > 0 || self.is_empty());
        roots
    }

    /// Root nodes in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.arena
            .iter()
            .filter(|(_, node)| node.is_root())
            .map(|(index, _)| NodeIndex(index))
    }

    /// Every node in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &SkeletonNode<H>)> + '_ {
        self.arena.iter().map(|(index, node)| (NodeIndex(index), node))
    }

    /// Every parent to child link, in node insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.nodes()
            .filter_map(|(index, node)| node.parent().map(|parent| (parent, index)))
    }

    /// Merges the hierarchy rooted at `root` into the tree.
    ///
    /// Returns `false` when the hierarchy is incompatible with what is
    /// already merged. The tree is then in an undefined state and must be
    /// discarded and rebuilt from all constituents.
    pub fn merge_subtree<S, C>(&mut self, root: &S, catalogue: &C) -> bool
    where
        S: SourceNode,
        C: TransformCatalogue<Handle = H>,
    {
        match self.try_merge_subtree(root, catalogue) {
            Ok(()) => true,
            Err(e) => {
                debug!("merge of '{}' rejected: {}", root.identifier(), e);
                false
            }
        }
    }

    /// Merges the hierarchy rooted at `root`, reporting why it was rejected.
    ///
    /// On error the tree is left as far as the merge got; no rollback is
    /// done.
    #[instrument(level = "debug", skip_all, fields(root = root.identifier()))]
    pub fn try_merge_subtree<S, C>(&mut self, root: &S, catalogue: &C) -> DomainResult<()>
    where
        S: SourceNode,
        C: TransformCatalogue<Handle = H>,
    {
        // Pre-order work list: (source node, parent it is merged under).
        let mut stack: Vec<(&S, Option<NodeIndex>)> = vec![(root, None)];

        while let Some((source, dest_parent)) = stack.pop() {
            let current = match self.node_index(source.identifier()) {
                None => self.add_new_node(source, dest_parent, catalogue)?,
                Some(existing) => {
                    if let Some(parent) = dest_parent {
                        self.attach_existing(existing, parent)?;
                    }
                    existing
                }
            };

            let children: Vec<&S> = source.children().collect();
            for child in children.into_iter().rev() {
                stack.push((child, Some(current)));
            }
        }

        debug_assert_eq!(self.lookup.len(), self.arena.len());
        Ok(())
    }

    fn add_new_node<S, C>(
        &mut self,
        source: &S,
        dest_parent: Option<NodeIndex>,
        catalogue: &C,
    ) -> DomainResult<NodeIndex>
    where
        S: SourceNode,
        C: TransformCatalogue<Handle = H>,
    {
        let identifier = source.identifier();
        let transform = catalogue
            .resolve(identifier)
            .ok_or_else(|| DomainError::MissingTransform(identifier.to_string()))?;

        let index = NodeIndex(self.arena.insert(SkeletonNode::new(
            identifier.to_string(),
            transform,
            dest_parent,
        )));
        self.lookup.insert(identifier.to_string(), index);
        if let Some(parent) = dest_parent {
            self.arena[parent.0].push_child(index);
        }
        trace!(identifier, position = index.position(), "added node");

        // A new node must not take over a child that is already attached
        // elsewhere.
        for child in source.children() {
            if let Some(existing) = self.node_index(child.identifier()) {
                if let Some(existing_parent) = self.node(existing).parent() {
                    return Err(DomainError::StructuralConflict {
                        identifier: child.identifier().to_string(),
                        existing_parent: self.node(existing_parent).identifier().to_string(),
                        requested_parent: identifier.to_string(),
                    });
                }
            }
        }

        Ok(index)
    }

    fn attach_existing(&mut self, existing: NodeIndex, parent: NodeIndex) -> DomainResult<()> {
        match self.node(existing).parent() {
            None => {
                if existing == parent || self.is_descendant_of(existing, parent) {
                    return Err(DomainError::CycleRejected {
                        identifier: self.node(existing).identifier().to_string(),
                        parent: self.node(parent).identifier().to_string(),
                    });
                }
                self.arena[existing.0].set_parent(parent);
                self.arena[parent.0].push_child(existing);
                trace!(
                    identifier = self.node(existing).identifier(),
                    parent = self.node(parent).identifier(),
                    "attached former root"
                );
                Ok(())
            }
            Some(current) if current == parent => Ok(()),
            Some(current) => Err(DomainError::StructuralConflict {
                identifier: self.node(existing).identifier().to_string(),
                existing_parent: self.node(current).identifier().to_string(),
                requested_parent: self.node(parent).identifier().to_string(),
            }),
        }
    }

    /// Checks the forest invariants, reporting the first violation.
    #[instrument(level = "debug", skip(self))]
    pub fn verify(&self) -> DomainResult<()> {
        let violation =
            |reason: String| -> DomainResult<()> { Err(DomainError::InvariantViolation(reason)) };

        if self.lookup.len() != self.arena.len() {
            return violation(format!(
                "{} lookup entries for {} nodes",
                self.lookup.len(),
                self.arena.len()
            ));
        }

        for (position, (index, node)) in self.nodes().enumerate() {
            if index.position() != position {
                return violation(format!("node '{}' is not densely placed", node.identifier()));
            }
            if self.node_index(node.identifier()) != Some(index) {
                return violation(format!("lookup disagrees for '{}'", node.identifier()));
            }
            if let Some(parent) = node.parent() {
                let Some(parent_node) = self.arena.get(parent.0) else {
                    return violation(format!("parent of '{}' is not in the tree", node.identifier()));
                };
                let listed = parent_node.children().iter().filter(|&&c| c == index).count();
                if listed != 1 {
                    return violation(format!(
                        "'{}' listed {} times among children of '{}'",
                        node.identifier(),
                        listed,
                        parent_node.identifier()
                    ));
                }
            }
            for &child in node.children() {
                match self.arena.get(child.0) {
                    Some(child_node) if child_node.parent() == Some(index) => {}
                    _ => {
                        return violation(format!(
                            "child link {} of '{}' does not point back",
                            child,
                            node.identifier()
                        ))
                    }
                }
            }
            // Walking up never takes more steps than there are nodes.
            if self.ancestors(index).nth(self.arena.len()).is_some() {
                return violation(format!("'{}' is its own ancestor", node.identifier()));
            }
        }

        if self.root_count() == 0 && !self.is_empty() {
            return violation("non-empty tree without a root".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::source::SourceBone;

    fn unit(_: &str) -> Option<()> {
        Some(())
    }

    #[test]
    fn given_new_tree_when_queried_then_is_empty() {
        let tree: NodeTree<()> = NodeTree::new();

        assert_eq!(tree.node_count(), 0);
        assert_eq!(tree.root_count(), 0);
        assert!(tree.node_index("anything").is_none());
        assert!(tree.index_at(0).is_none());
        assert!(tree.verify().is_ok());
    }

    #[test]
    fn given_single_bone_when_merged_then_is_root_at_position_zero() {
        let mut tree = NodeTree::new();

        assert!(tree.merge_subtree(&SourceBone::new("a"), &unit));

        let a = tree.node_index("a").unwrap();
        assert_eq!(a.position(), 0);
        assert_eq!(tree.index_at(0), Some(a));
        assert!(tree.node(a).is_root());
        assert_eq!(tree.root_count(), 1);
    }

    #[test]
    fn given_missing_transform_when_merging_then_rejected() {
        let mut tree = NodeTree::new();
        let catalogue = |id: &str| (id != "b").then_some(());
        let root = SourceBone::with_children("a", vec![SourceBone::new("b")]);

        let err = tree.try_merge_subtree(&root, &catalogue).unwrap_err();

        assert_eq!(err, DomainError::MissingTransform("b".to_string()));
        assert!(err.is_merge_rejection());
    }

    #[test]
    fn given_bone_listing_itself_as_child_when_merging_then_cycle_rejected() {
        let mut tree = NodeTree::new();
        let root = SourceBone::with_children("a", vec![SourceBone::new("a")]);

        let err = tree.try_merge_subtree(&root, &unit).unwrap_err();

        assert!(matches!(err, DomainError::CycleRejected { .. }));
    }

    #[test]
    #[should_panic]
    fn given_index_from_other_tree_when_accessing_then_panics() {
        let mut big = NodeTree::new();
        big.merge_subtree(
            &SourceBone::with_children("a", vec![SourceBone::new("b")]),
            &unit,
        );
        let foreign = big.node_index("b").unwrap();
        let small: NodeTree<()> = NodeTree::new();

        small.node(foreign);
    }
}

//! Read-only queries on a merged [`NodeTree`].

use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::NodeIndex;
use crate::domain::tree::NodeTree;

/// Walks from a node's parent up to its root.
pub struct Ancestors<'a, H> {
    tree: &'a NodeTree<H>,
    next: Option<NodeIndex>,
}

impl<H> Iterator for Ancestors<'_, H> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        let current = self.next?;
        self.next = self.tree.node(current).parent();
        Some(current)
    }
}

impl<H> NodeTree<H> {
    /// Parent chain of `index`, nearest first, excluding `index` itself.
    pub fn ancestors(&self, index: NodeIndex) -> Ancestors<'_, H> {
        Ancestors {
            tree: self,
            next: self.node(index).parent(),
        }
    }

    /// The direct child of `index` named `identifier`.
    ///
    /// `None` also when the identifier exists elsewhere in the tree.
    pub fn find_child(&self, index: NodeIndex, identifier: &str) -> Option<NodeIndex> {
        self.check_index(index);
        self.node_index(identifier)
            .filter(|&child| self.node(child).parent() == Some(index))
    }

    /// True iff `query` is a direct or indirect child of `ancestor`.
    ///
    /// A node is not its own descendant.
    pub fn is_descendant_of(&self, ancestor: NodeIndex, query: NodeIndex) -> bool {
        self.check_index(ancestor);
        self.ancestors(query).any(|index| index == ancestor)
    }

    /// The unique path between two nodes, `start` first and `end` last.
    ///
    /// Follows parent and child links alike, so the path for `(end, start)`
    /// is this path reversed.
    #[instrument(level = "trace", skip(self))]
    pub fn path_indices(&self, start: NodeIndex, end: NodeIndex) -> DomainResult<Vec<NodeIndex>> {
        let mut up_from_start: Vec<NodeIndex> =
            std::iter::once(start).chain(self.ancestors(start)).collect();
        let mut up_from_end: Vec<NodeIndex> =
            std::iter::once(end).chain(self.ancestors(end)).collect();

        if up_from_start.last() != up_from_end.last() {
            return Err(DomainError::Disconnected {
                start: self.node(start).identifier().to_string(),
                end: self.node(end).identifier().to_string(),
            });
        }

        // Drop the shared upper part, keeping the lowest common ancestor once.
        let mut common = None;
        while up_from_start.last().is_some() && up_from_start.last() == up_from_end.last() {
            common = up_from_start.pop();
            up_from_end.pop();
        }

        up_from_start.extend(common);
        up_from_start.extend(up_from_end.into_iter().rev());
        Ok(up_from_start)
    }

    /// Number of nodes on the longest root to leaf chain.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(NodeIndex, usize)> = self.roots().map(|root| (root, 1)).collect();

        while let Some((index, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for &child in self.node(index).children() {
                stack.push((child, depth + 1));
            }
        }
        max_depth
    }

    /// Identifiers of all nodes without children, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children().is_empty())
            .map(|(_, node)| node.identifier().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::source::SourceBone;
    use crate::domain::tree::NodeTree;

    fn chain() -> NodeTree<()> {
        // a -> b -> c
        let mut tree = NodeTree::new();
        let root = SourceBone::with_children(
            "a",
            vec![SourceBone::with_children("b", vec![SourceBone::new("c")])],
        );
        assert!(tree.merge_subtree(&root, &|_: &str| Some(())));
        tree
    }

    #[test]
    fn given_chain_when_listing_ancestors_then_nearest_first() {
        let tree = chain();
        let ids: Vec<&str> = tree
            .ancestors(tree.node_index("c").unwrap())
            .map(|i| tree.node(i).identifier())
            .collect();

        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn given_node_when_testing_descendant_of_itself_then_false() {
        let tree = chain();
        let a = tree.node_index("a").unwrap();

        assert!(!tree.is_descendant_of(a, a));
    }

    #[test]
    fn given_chain_when_measuring_then_depth_three_one_leaf() {
        let tree = chain();

        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.leaf_nodes(), vec!["c".to_string()]);
    }
}

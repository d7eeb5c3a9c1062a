use tracing::instrument;

use crate::domain::node::{NodeIndex, SkeletonNode};
use crate::domain::tree::NodeTree;

impl<H> NodeTree<H> {
    /// Pre-order over every hierarchy, roots in insertion order.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator<'_, H> {
        TreeIterator::new(self)
    }

    /// Post-order over every hierarchy: children before their parent.
    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator<'_, H> {
        PostOrderIterator::new(self)
    }
}

pub struct TreeIterator<'a, H> {
    tree: &'a NodeTree<H>,
    stack: Vec<NodeIndex>,
}

impl<'a, H> TreeIterator<'a, H> {
    fn new(tree: &'a NodeTree<H>) -> Self {
        let mut stack: Vec<NodeIndex> = tree.roots().collect();
        stack.reverse();
        Self { tree, stack }
    }
}

impl<'a, H> Iterator for TreeIterator<'a, H> {
    type Item = (NodeIndex, &'a SkeletonNode<H>);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let node = self.tree.node(current);
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children().iter().rev().copied());
        Some((current, node))
    }
}

pub struct PostOrderIterator<'a, H> {
    tree: &'a NodeTree<H>,
    stack: Vec<(NodeIndex, bool)>,
}

impl<'a, H> PostOrderIterator<'a, H> {
    fn new(tree: &'a NodeTree<H>) -> Self {
        let mut roots: Vec<NodeIndex> = tree.roots().collect();
        roots.reverse();
        let stack = roots.into_iter().map(|root| (root, false)).collect();
        Self { tree, stack }
    }
}

impl<'a, H> Iterator for PostOrderIterator<'a, H> {
    type Item = (NodeIndex, &'a SkeletonNode<H>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            let node = self.tree.node(current);
            if visited {
                return Some((current, node));
            }
            self.stack.push((current, true));
            for &child in node.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

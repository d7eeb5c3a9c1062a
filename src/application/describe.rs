//! Textual diagnostics of a merged skeleton
use std::fmt;

use termtree::Tree;
use tracing::instrument;

use crate::domain::{NodeIndex, NodeTree};

/// Flat node list followed by every root's indented hierarchy.
///
/// Returned by [`NodeTree::describe`]; render it with `to_string()` or `{}`.
pub struct Description<'a, H> {
    tree: &'a NodeTree<H>,
}

impl<H> NodeTree<H> {
    pub fn describe(&self) -> Description<'_, H> {
        Description { tree: self }
    }
}

impl<H> fmt::Display for Description<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.tree;
        writeln!(f, "NodeTree: nodes={}", tree.node_count())?;
        writeln!(f, "\tflat node list:")?;
        for (index, node) in tree.nodes() {
            writeln!(f, "\t\t{}->{}", index, node)?;
        }

        writeln!(f, "\tnode hierarchies:")?;
        let mut printed = 0;
        for (number, root) in tree.roots().enumerate() {
            writeln!(f, "\t\thierarchy {}:", number)?;
            let mut stack: Vec<(NodeIndex, usize)> = vec![(root, 3)];
            while let Some((index, tabs)) = stack.pop() {
                let node = tree.node(index);
                let parent = node
                    .parent()
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "-".to_string());
                writeln!(
                    f,
                    "{}identifier={}; parent={}; children={}",
                    "\t".repeat(tabs),
                    node.identifier(),
                    parent,
                    node.child_count()
                )?;
                printed += 1;
                stack.extend(node.children().iter().rev().map(|&c| (c, tabs + 1)));
            }
        }

        if printed != tree.node_count() {
            writeln!(
                f,
                "\tunreachable nodes: {}",
                tree.node_count().saturating_sub(printed)
            )?;
        }
        Ok(())
    }
}

/// Levels rendered by [`TreeNodeConvert::to_tree_string`] below each root.
///
/// `termtree` renders recursively, so deeper bones are replaced by a single
/// marker leaf counting what was cut off.
pub const MAX_RENDER_DEPTH: usize = 256;

/// Conversion into a [`termtree::Tree`] for terminal output.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<H> TreeNodeConvert for NodeTree<H> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        if self.is_empty() {
            return Tree::new("Empty tree".to_string());
        }

        let mut depth = vec![0usize; self.node_count()];
        for (index, node) in self.iter() {
            for &child in node.children() {
                depth[child.position()] = depth[index.position()] + 1;
            }
        }

        // Children finish before their parent, so each parent takes the
        // trees of its rendered children off the top of the stack.
        let mut hidden = vec![0usize; self.node_count()];
        let mut finished: Vec<Tree<String>> = Vec::new();
        for (index, node) in self.iter_postorder() {
            let level = depth[index.position()];
            if level > MAX_RENDER_DEPTH {
                if let Some(parent) = node.parent() {
                    hidden[parent.position()] += 1 + hidden[index.position()];
                }
                continue;
            }
            let mut branch = Tree::new(node.identifier().to_string());
            if level == MAX_RENDER_DEPTH {
                let cut = hidden[index.position()];
                if cut > 0 {
                    branch.push(Tree::new(format!("... {} deeper bones not shown", cut)));
                }
            } else {
                let leaves = finished.split_off(finished.len().saturating_sub(node.child_count()));
                branch = branch.with_leaves(leaves);
            }
            finished.push(branch);
        }

        let label = format!("skeleton ({} nodes, {} roots)", self.node_count(), self.root_count());
        Tree::new(label).with_leaves(finished)
    }
}

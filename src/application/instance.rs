//! Per-instance skeleton cache
//!
//! Owns the constituent hierarchies of one composite instance and the
//! merged [`NodeTree`] built from them. The tree is created lazily and
//! rebuilt from scratch whenever a constituent may have changed.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{NodeTree, SourceNode, TransformCatalogue};

/// Merged skeleton of one composite instance.
pub struct InstanceSkeleton<S, C: TransformCatalogue> {
    /// Constituent roots, merged in this order
    constituents: Vec<Arc<S>>,
    catalogue: C,
    /// `None` before the first build and after an incompatible one
    tree: Option<NodeTree<C::Handle>>,
    dirty: bool,
    regenerations: u32,
}

impl<S, C> InstanceSkeleton<S, C>
where
    S: SourceNode,
    C: TransformCatalogue,
{
    pub fn new(catalogue: C) -> Self {
        Self {
            constituents: Vec::new(),
            catalogue,
            tree: None,
            dirty: true,
            regenerations: 0,
        }
    }

    pub fn add_constituent(&mut self, root: Arc<S>) {
        debug!("add constituent '{}'", root.identifier());
        self.constituents.push(root);
        self.invalidate();
    }

    /// Removes the constituent at `position`, returning it if present.
    pub fn remove_constituent(&mut self, position: usize) -> Option<Arc<S>> {
        if position >= self.constituents.len() {
            return None;
        }
        let removed = self.constituents.remove(position);
        debug!("remove constituent '{}'", removed.identifier());
        self.invalidate();
        Some(removed)
    }

    pub fn constituents(&self) -> &[Arc<S>] {
        &self.constituents
    }

    pub fn constituent_count(&self) -> usize {
        self.constituents.len()
    }

    pub fn catalogue(&self) -> &C {
        &self.catalogue
    }

    /// Mutable catalogue access. Handles in the tree may go stale, so the
    /// tree is marked for rebuild.
    pub fn catalogue_mut(&mut self) -> &mut C {
        self.invalidate();
        &mut self.catalogue
    }

    /// Marks the tree for rebuild on next access, e.g. after an asset reload.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The merged tree, rebuilt first if dirty.
    ///
    /// `None` when the constituents are incompatible with each other.
    pub fn tree(&mut self) -> Option<&NodeTree<C::Handle>> {
        if self.dirty {
            self.rebuild();
        }
        self.tree.as_ref()
    }

    /// Rebuilds the tree from a fresh one, merging every constituent in order.
    pub fn rebuild(&mut self) -> bool {
        match self.try_rebuild() {
            Ok(_) => true,
            Err(e) => {
                warn!("instance skeleton unavailable: {}", e);
                false
            }
        }
    }

    /// Rebuilds the tree, reporting the first incompatible constituent.
    ///
    /// On error no tree is kept until the next rebuild.
    #[instrument(level = "debug", skip(self), fields(constituents = self.constituents.len()))]
    pub fn try_rebuild(&mut self) -> ApplicationResult<&NodeTree<C::Handle>> {
        self.regenerations += 1;
        self.dirty = false;
        self.tree = None;

        let tree = self.merge_all()?;
        debug!(nodes = tree.node_count(), roots = tree.root_count(), "rebuilt");
        Ok(self.tree.insert(tree))
    }

    fn merge_all(&self) -> ApplicationResult<NodeTree<C::Handle>> {
        let mut tree = NodeTree::new();
        for root in &self.constituents {
            tree.try_merge_subtree(root.as_ref(), &self.catalogue)
                .map_err(|source| ApplicationError::Incompatible {
                    constituent: root.identifier().to_string(),
                    source,
                })?;
        }
        Ok(tree)
    }

    /// Number of rebuilds, counting one still pending.
    ///
    /// Node indices obtained from [`Self::tree`] stay valid while this
    /// value is unchanged.
    pub fn regeneration_count(&self) -> u32 {
        self.regenerations + u32::from(self.dirty)
    }
}

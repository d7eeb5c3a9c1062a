//! Debug drawing of a merged skeleton
//!
//! Produces renderer-agnostic primitives: a marker on every root and a
//! segment from each bone's parent to the bone itself. Rendering them is
//! left to the caller.

use glam::Vec3;
use tracing::{instrument, trace};

use crate::config::{DrawSettings, Rgba};
use crate::domain::{NodeIndex, NodeTree};

#[derive(Debug, Clone, PartialEq)]
pub enum DebugPrimitive {
    /// Star with centred axes on a root node
    RootMarker {
        index: NodeIndex,
        position: Vec3,
        size: f32,
        colour: Rgba,
        highlight: Rgba,
    },
    /// Line from the parent's origin to the bone's origin, plus axes at the bone
    Bone {
        index: NodeIndex,
        from: Vec3,
        to: Vec3,
        /// Colour at the parent end
        from_colour: Rgba,
        /// Colour at the bone end, marks the bone's kind
        to_colour: Rgba,
        axis_size: f32,
    },
}

impl DebugPrimitive {
    pub fn index(&self) -> NodeIndex {
        match self {
            DebugPrimitive::RootMarker { index, .. } | DebugPrimitive::Bone { index, .. } => *index,
        }
    }
}

/// Colour of a non-root bone, `None` when the bone is not drawn.
fn bone_colour(style: &DrawSettings, identifier: &str) -> Option<Rgba> {
    if style.is_hardpoint(identifier) {
        style.draw_hardpoints.then_some(style.hardpoint_colour)
    } else if style.is_blend_bone(identifier) {
        style.draw_blend_bones.then_some(style.blend_bone_colour)
    } else {
        Some(style.base_colour)
    }
}

/// Builds the debug primitives of `tree` in node index order.
///
/// `resolve` yields the world position of a node from its transform handle;
/// nodes it cannot place are skipped, as are bones whose parent it cannot
/// place.
#[instrument(level = "debug", skip_all, fields(nodes = tree.node_count()))]
pub fn debug_draw<H, F>(tree: &NodeTree<H>, style: &DrawSettings, mut resolve: F) -> Vec<DebugPrimitive>
where
    F: FnMut(NodeIndex, &H) -> Option<Vec3>,
{
    let positions: Vec<Option<Vec3>> = tree
        .nodes()
        .map(|(index, node)| resolve(index, node.transform()))
        .collect();

    let mut primitives = Vec::with_capacity(tree.node_count());
    for (index, node) in tree.nodes() {
        let Some(position) = positions[index.position()] else {
            trace!(identifier = node.identifier(), "no position, skipped");
            continue;
        };

        match node.parent() {
            None => primitives.push(DebugPrimitive::RootMarker {
                index,
                position,
                size: style.size,
                colour: style.base_colour,
                highlight: style.root_colour,
            }),
            Some(parent) => {
                let Some(to_colour) = bone_colour(style, node.identifier()) else {
                    continue;
                };
                let Some(from) = positions[parent.position()] else {
                    continue;
                };
                primitives.push(DebugPrimitive::Bone {
                    index,
                    from,
                    to: position,
                    from_colour: style.base_colour,
                    to_colour,
                    axis_size: style.size,
                });
            }
        }
    }
    primitives
}

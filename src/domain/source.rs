//! Source hierarchies fed into the merge.

use serde::{Deserialize, Serialize};

/// A node of a constituent's own bone hierarchy.
///
/// Only the identifier and the ordered children are read; the merge never
/// holds on to source nodes after it returns.
pub trait SourceNode {
    fn identifier(&self) -> &str;

    fn children(&self) -> impl Iterator<Item = &Self>;
}

/// Owned bone hierarchy, as loaded from a hierarchy description file.
///
/// `Clone` and `Drop` work level by level, so hierarchies of any depth can be
/// copied and released.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceBone {
    pub name: String,
    /// World position used by debug drawing; not read by the merge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SourceBone>,
}

impl SourceBone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(name: impl Into<String>, children: Vec<SourceBone>) -> Self {
        Self {
            name: name.into(),
            position: None,
            children,
        }
    }

    pub fn at(mut self, position: [f32; 3]) -> Self {
        self.position = Some(position);
        self
    }

    /// Visits this bone and every descendant, parents before children.
    pub fn walk(&self) -> Vec<&SourceBone> {
        let mut visited = Vec::new();
        let mut stack = vec![self];
        while let Some(bone) = stack.pop() {
            visited.push(bone);
            for child in bone.children.iter().rev() {
                stack.push(child);
            }
        }
        visited
    }
}

impl Clone for SourceBone {
    fn clone(&self) -> Self {
        // Children finish before their parent and are taken off the top.
        let mut pending = vec![(self, false)];
        let mut finished: Vec<SourceBone> = Vec::new();
        while let Some((bone, expanded)) = pending.pop() {
            if expanded {
                let children = finished.split_off(finished.len() - bone.children.len());
                finished.push(SourceBone {
                    name: bone.name.clone(),
                    position: bone.position,
                    children,
                });
            } else {
                pending.push((bone, true));
                pending.extend(bone.children.iter().rev().map(|child| (child, false)));
            }
        }
        finished
            .pop()
            .unwrap_or_else(|| SourceBone::new(self.name.clone()))
    }
}

impl Drop for SourceBone {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut bone) = stack.pop() {
            stack.append(&mut bone.children);
        }
    }
}

impl SourceNode for SourceBone {
    fn identifier(&self) -> &str {
        &self.name
    }

    fn children(&self) -> impl Iterator<Item = &Self> {
        self.children.iter()
    }
}

//! Constituent hierarchies described in a TOML file
//!
//! ```toml
//! [[constituents]]
//! name = "body"
//!
//! [constituents.root]
//! name = "Scene Root"
//! position = [0.0, 0.0, 0.0]
//!
//! [[constituents.root.children]]
//! name = "biped"
//! ```

use std::path::Path;
use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::InstanceSkeleton;
use crate::domain::{NodeCatalogue, SourceBone};
use crate::infrastructure::{InfraError, InfraResult};

/// World position of a bone, `None` when the file does not give one.
pub type Placement = Option<Vec3>;

/// One independently loaded sub-model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constituent {
    pub name: String,
    pub root: SourceBone,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchyFile {
    #[serde(default)]
    pub constituents: Vec<Constituent>,
}

impl HierarchyFile {
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> InfraResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
        let file: Self = toml::from_str(&content).map_err(|e| InfraError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!("loaded {} constituents", file.constituents.len());
        Ok(file)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Transform catalogue of every bone named in the file.
    ///
    /// A bone appearing in several constituents shares one entry; the first
    /// position given for it wins.
    pub fn catalogue(&self) -> NodeCatalogue<Placement> {
        let mut catalogue: NodeCatalogue<Placement> = NodeCatalogue::new();
        for bone in self.constituents.iter().flat_map(|c| c.root.walk()) {
            let placement = bone.position.map(Vec3::from);
            let known = catalogue.find(&bone.name).map(|entry| entry.is_some());
            match (known, placement) {
                (None, _) | (Some(false), Some(_)) => {
                    catalogue.insert(bone.name.clone(), placement);
                }
                _ => {}
            }
        }
        catalogue
    }

    /// Instance skeleton over all constituents, merged in file order.
    pub fn instance(&self) -> InstanceSkeleton<SourceBone, NodeCatalogue<Placement>> {
        let mut instance = InstanceSkeleton::new(self.catalogue());
        for constituent in &self.constituents {
            instance.add_constituent(Arc::new(constituent.root.clone()));
        }
        instance
    }

    pub fn constituent(&self, name: &str) -> Option<&Constituent> {
        self.constituents.iter().find(|c| c.name == name)
    }
}

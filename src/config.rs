//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/skelmerge/skelmerge.toml`
//! 3. Local config: file given with `--config`
//! 4. Environment variables: `SKELMERGE__*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, ApplicationResult};

/// RGBA colour, one byte per channel.
pub type Rgba = [u8; 4];

pub const WHITE: Rgba = [255, 255, 255, 255];
pub const RED: Rgba = [255, 0, 0, 255];
pub const CYAN: Rgba = [0, 255, 255, 255];
pub const YELLOW: Rgba = [255, 255, 0, 255];

/// Style of the debug skeleton drawing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DrawSettings {
    /// Length of root markers and axes
    pub size: f32,
    /// Colour of ordinary bones
    pub base_colour: Rgba,
    /// Highlight colour of root markers
    pub root_colour: Rgba,
    /// Colour of hardpoint bones, when drawn
    pub hardpoint_colour: Rgba,
    /// Colour of blend bones, when drawn
    pub blend_bone_colour: Rgba,
    /// Identifier prefixes marking hardpoints (e.g., ["HP_"])
    pub hardpoint_prefixes: Vec<String>,
    /// Identifier substrings marking blend bones (e.g., ["BlendBone"])
    pub blend_bone_markers: Vec<String>,
    pub draw_hardpoints: bool,
    pub draw_blend_bones: bool,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            size: 0.1,
            base_colour: WHITE,
            root_colour: RED,
            hardpoint_colour: CYAN,
            blend_bone_colour: YELLOW,
            hardpoint_prefixes: vec!["HP_".into()],
            blend_bone_markers: vec!["BlendBone".into()],
            draw_hardpoints: false,
            draw_blend_bones: false,
        }
    }
}

/// Raw draw settings for intermediate parsing (arrays are Option to detect "not specified").
///
/// Used during layered config merging to distinguish between:
/// - `None` → field not specified, inherit from base
/// - `Some([])` → explicit empty array
/// - `Some([...])` → explicit values to merge
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDrawSettings {
    pub size: Option<f32>,
    pub base_colour: Option<Rgba>,
    pub root_colour: Option<Rgba>,
    pub hardpoint_colour: Option<Rgba>,
    pub blend_bone_colour: Option<Rgba>,
    pub hardpoint_prefixes: Option<Vec<String>>,
    pub blend_bone_markers: Option<Vec<String>>,
    pub draw_hardpoints: Option<bool>,
    pub draw_blend_bones: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub draw: RawDrawSettings,
}

impl DrawSettings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["HP_"], &["Socket_"])        // → ["HP_", "Socket_"]
    /// merge_array(&["HP_"], &["!HP_", "Attach"]) // → ["Attach"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for pattern in overlay {
            if let Some(negated) = pattern.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(pattern.clone());
            }
        }

        // Convert to sorted Vec for deterministic output
        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    fn scalars_from(&self, overlay: &RawDrawSettings) -> Self {
        Self {
            size: overlay.size.unwrap_or(self.size),
            base_colour: overlay.base_colour.unwrap_or(self.base_colour),
            root_colour: overlay.root_colour.unwrap_or(self.root_colour),
            hardpoint_colour: overlay.hardpoint_colour.unwrap_or(self.hardpoint_colour),
            blend_bone_colour: overlay.blend_bone_colour.unwrap_or(self.blend_bone_colour),
            hardpoint_prefixes: self.hardpoint_prefixes.clone(),
            blend_bone_markers: self.blend_bone_markers.clone(),
            draw_hardpoints: overlay.draw_hardpoints.unwrap_or(self.draw_hardpoints),
            draw_blend_bones: overlay.draw_blend_bones.unwrap_or(self.draw_blend_bones),
        }
    }

    /// Merge overlay config onto self (base).
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - Arrays: union merge with negation support (if overlay specified)
    pub fn merge(&self, overlay: &RawDrawSettings) -> Self {
        let mut merged = self.scalars_from(overlay);
        if let Some(prefixes) = &overlay.hardpoint_prefixes {
            merged.hardpoint_prefixes = Self::merge_array(&self.hardpoint_prefixes, prefixes);
        }
        if let Some(markers) = &overlay.blend_bone_markers {
            merged.blend_bone_markers = Self::merge_array(&self.blend_bone_markers, markers);
        }
        merged
    }

    /// Apply global config onto defaults.
    ///
    /// Unlike `merge()`, arrays use REPLACE semantics: the global config
    /// defines the baseline naming convention of a studio's assets, and a
    /// local file then adds to it.
    pub fn apply_global(&self, global: &RawDrawSettings) -> Self {
        let mut merged = self.scalars_from(global);
        if let Some(prefixes) = &global.hardpoint_prefixes {
            merged.hardpoint_prefixes = prefixes.clone();
        }
        if let Some(markers) = &global.blend_bone_markers {
            merged.blend_bone_markers = markers.clone();
        }
        merged
    }

    pub fn is_hardpoint(&self, identifier: &str) -> bool {
        self.hardpoint_prefixes
            .iter()
            .any(|prefix| identifier.starts_with(prefix.as_str()))
    }

    pub fn is_blend_bone(&self, identifier: &str) -> bool {
        self.blend_bone_markers
            .iter()
            .any(|marker| identifier.contains(marker.as_str()))
    }
}

/// Unified configuration for skelmerge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    /// Debug drawing style
    pub draw: DrawSettings,
}

/// Get the XDG config directory for skelmerge.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "skelmerge").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("skelmerge.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> ApplicationResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            draw: self.draw.merge(&overlay.draw),
        }
    }

    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            draw: self.draw.apply_global(&global.draw),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Optional config file, e.g. from `--config`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/skelmerge/skelmerge.toml` (arrays REPLACE defaults)
    /// 3. Local config file (arrays UNION with global, `!item` removes)
    /// 4. Environment variables: `SKELMERGE__*` prefix (REPLACES)
    pub fn load(local: Option<&Path>) -> ApplicationResult<Self> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(local_path) = local {
            if !local_path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", local_path.display()),
                });
            }
            let raw = load_raw_settings(local_path)?;
            current = current.merge_with(&raw);
        }

        Self::apply_env_overrides(current)
    }

    /// Apply SKELMERGE__* environment variables as explicit overrides.
    ///
    /// Env vars replace values (not merge) - they are explicit user overrides.
    fn apply_env_overrides(mut settings: Self) -> ApplicationResult<Self> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("SKELMERGE")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("draw.hardpoint_prefixes")
                .with_list_parse_key("draw.blend_bone_markers")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get::<f32>("draw.size") {
            settings.draw.size = val;
        }
        if let Ok(val) = config.get_bool("draw.draw_hardpoints") {
            settings.draw.draw_hardpoints = val;
        }
        if let Ok(val) = config.get_bool("draw.draw_blend_bones") {
            settings.draw.draw_blend_bones = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("draw.hardpoint_prefixes") {
            settings.draw.hardpoint_prefixes = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("draw.blend_bone_markers") {
            settings.draw.blend_bone_markers = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

//! Asset registry
//!
//! Mesh templates are resolved once, before the first game, into an
//! explicit `AssetRegistry` that the controller owns. Nothing reads assets
//! through globals.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while resolving assets
#[derive(Debug, Error)]
pub enum AssetError {
    /// The source has no asset under this name
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// The asset could not be parsed
    #[error("Malformed asset '{name}': {details}")]
    Malformed { name: String, details: String },

    /// The asset parsed but holds unusable values
    #[error("Invalid asset '{name}': {reason}")]
    Invalid { name: String, reason: String },
}

/// Renderable description of an entity kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshTemplate {
    pub name: String,
    /// Packed 0xRRGGBB
    pub color: u32,
    pub scale: f32,
    /// Base orientation (Euler XYZ, radians)
    #[serde(default)]
    pub rotation: Vec3,
    /// Half size of the unscaled mesh
    pub half_extents: Vec3,
}

impl MeshTemplate {
    fn validate(self) -> Result<Self, AssetError> {
        let invalid = |reason: &str| AssetError::Invalid {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(invalid("scale must be positive"));
        }
        if !self.half_extents.is_finite() || self.half_extents.min_element() <= 0.0 {
            return Err(invalid("half extents must be positive"));
        }
        if self.color > 0xFF_FFFF {
            return Err(invalid("color must be 0xRRGGBB"));
        }
        Ok(self)
    }

    /// Color as linear RGBA components
    pub fn rgba(&self) -> [f32; 4] {
        let r = ((self.color >> 16) & 0xFF) as f32 / 255.0;
        let g = ((self.color >> 8) & 0xFF) as f32 / 255.0;
        let b = (self.color & 0xFF) as f32 / 255.0;
        [r, g, b, 1.0]
    }
}

/// Where asset text comes from (bundled data, fetched files, test fixtures)
pub trait AssetSource {
    fn fetch(&self, name: &str) -> Result<String, AssetError>;
}

/// Templates compiled into the binary
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinAssets;

const PLAYER_TEMPLATE: &str = r#"{
    "name": "player",
    "color": 14537984,
    "scale": 1.0,
    "half_extents": [4.0, 2.5, 4.0]
}"#;

const ENEMY_TEMPLATE: &str = r#"{
    "name": "enemy",
    "color": 15817762,
    "scale": 1.0,
    "rotation": [3.15, 0.0, 3.15],
    "half_extents": [2.5, 2.5, 2.5]
}"#;

const PROJECTILE_TEMPLATE: &str = r#"{
    "name": "projectile",
    "color": 14540253,
    "scale": 1.0,
    "half_extents": [1.0, 1.0, 1.0]
}"#;

impl AssetSource for BuiltinAssets {
    fn fetch(&self, name: &str) -> Result<String, AssetError> {
        match name {
            "player" => Ok(PLAYER_TEMPLATE.to_string()),
            "enemy" => Ok(ENEMY_TEMPLATE.to_string()),
            "projectile" => Ok(PROJECTILE_TEMPLATE.to_string()),
            _ => Err(AssetError::NotFound(name.to_string())),
        }
    }
}

/// Every template the game needs, loaded
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRegistry {
    pub player: MeshTemplate,
    pub enemy: MeshTemplate,
    pub projectile: MeshTemplate,
}

impl AssetRegistry {
    /// Resolve all templates from `source`; the first failure aborts
    pub fn load(source: &impl AssetSource) -> Result<Self, AssetError> {
        let registry = Self {
            player: load_template(source, "player")?,
            enemy: load_template(source, "enemy")?,
            projectile: load_template(source, "projectile")?,
        };
        log::info!("Assets loaded: player, enemy, projectile");
        Ok(registry)
    }
}

fn load_template(source: &impl AssetSource, name: &str) -> Result<MeshTemplate, AssetError> {
    let text = source.fetch(name)?;
    let template: MeshTemplate =
        serde_json::from_str(&text).map_err(|e| AssetError::Malformed {
            name: name.to_string(),
            details: e.to_string(),
        })?;
    template.validate()
}

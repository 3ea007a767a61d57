//! Render config document
//!
//! The root of a render job: parameters, the active scene, and five
//! name-keyed entity tables. Table order is preserved through
//! serialization.

use crate::builtin;
use crate::camera::CameraData;
use crate::error::SchemaResult;
use crate::geometric::GeometricData;
use crate::kind::EntityKind;
use crate::material::MaterialData;
use crate::reference::Table;
use crate::scene::{SceneData, SceneRef};
use crate::texture::TextureData;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sampling and output parameters of a render job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderParameters {
    pub image_dimensions: [u32; 2],
    pub tile_dimensions: [u32; 2],
    pub gamma_correction: f64,
    pub samples_per_checkpoint: u32,
    pub total_checkpoints: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_checkpoint_limit: Option<u32>,
    pub max_bounces: u32,
    pub use_scaling_truncation: bool,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            image_dimensions: [500, 500],
            tile_dimensions: [1, 1],
            gamma_correction: 2.0,
            samples_per_checkpoint: 10,
            total_checkpoints: 100,
            saved_checkpoint_limit: Some(1),
            max_bounces: 50,
            use_scaling_truncation: true,
        }
    }
}

/// A complete render config document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub name: String,
    pub parameters: RenderParameters,
    pub active_scene: SceneRef,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub scenes: Table<SceneData>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub cameras: Table<CameraData>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub textures: Table<TextureData>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub materials: Table<MaterialData>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub geometrics: Table<GeometricData>,
}

impl RenderConfig {
    /// Create a config whose active scene is the given inline scene
    pub fn new(name: impl Into<String>, scene: SceneData) -> Self {
        Self {
            name: name.into(),
            parameters: RenderParameters::default(),
            active_scene: SceneRef::inline(scene),
            scenes: IndexMap::new(),
            cameras: IndexMap::new(),
            textures: IndexMap::new(),
            materials: IndexMap::new(),
            geometrics: IndexMap::new(),
        }
    }

    /// Decode from JSON text
    pub fn from_json(text: &str) -> SchemaResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encode as pretty JSON text
    pub fn to_json_pretty(&self) -> SchemaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Dynamic view of this config
    pub fn to_value(&self) -> SchemaResult<Value> {
        Ok(Value::from_typed(self)?)
    }

    /// Decode from a dynamic view
    pub fn from_value(value: &Value) -> SchemaResult<Self> {
        Ok(value.to_typed()?)
    }

    /// Add any built-in resource the document does not already define.
    pub fn with_builtins(mut self) -> Self {
        builtin::insert_missing(&mut self);
        self
    }

    /// Names stored in the table of the given kind
    pub fn names(&self, kind: EntityKind) -> Vec<&str> {
        fn keys<T>(table: &Table<T>) -> Vec<&str> {
            table.keys().map(String::as_str).collect()
        }

        match kind {
            EntityKind::Texture => keys(&self.textures),
            EntityKind::Material => keys(&self.materials),
            EntityKind::Geometric => keys(&self.geometrics),
            EntityKind::Camera => keys(&self.cameras),
            EntityKind::Scene => keys(&self.scenes),
        }
    }

    /// Whether the table of the given kind holds `name`
    pub fn contains(&self, kind: EntityKind, name: &str) -> bool {
        match kind {
            EntityKind::Texture => self.textures.contains_key(name),
            EntityKind::Material => self.materials.contains_key(name),
            EntityKind::Geometric => self.geometrics.contains_key(name),
            EntityKind::Camera => self.cameras.contains_key(name),
            EntityKind::Scene => self.scenes.contains_key(name),
        }
    }

    /// Remove an entry from the table of the given kind
    pub fn remove(&mut self, kind: EntityKind, name: &str) -> bool {
        match kind {
            EntityKind::Texture => self.textures.shift_remove(name).is_some(),
            EntityKind::Material => self.materials.shift_remove(name).is_some(),
            EntityKind::Geometric => self.geometrics.shift_remove(name).is_some(),
            EntityKind::Camera => self.cameras.shift_remove(name).is_some(),
            EntityKind::Scene => self.scenes.shift_remove(name).is_some(),
        }
    }

    /// Total number of table entries
    pub fn entity_count(&self) -> usize {
        self.textures.len()
            + self.materials.len()
            + self.geometrics.len()
            + self.cameras.len()
            + self.scenes.len()
    }
}

//! # Luxide Schema
//!
//! Typed model of Luxide render configs:
//! - Five entity kinds (textures, materials, geometrics, cameras, scenes)
//!   stored in name-keyed tables
//! - Reference-or-inline fields linking entities together
//! - A dynamic [`Value`] tree used by the editing form
//! - Built-in resources and starter templates
//!
//! ## Architecture
//!
//! ```text
//! RenderConfig
//!   ├── active_scene ──► SceneRef
//!   ├── scenes      : name → SceneData     ──► GeometricRef*, CameraRef
//!   ├── geometrics  : name → GeometricData ──► GeometricRef*, MaterialRef, TextureRef
//!   ├── materials   : name → MaterialData  ──► TextureRef (reflectance, emittance)
//!   ├── textures    : name → TextureData   ──► TextureRef (checker)
//!   └── cameras     : name → CameraData
//! ```

pub mod builtin;
pub mod camera;
pub mod config;
pub mod error;
pub mod geometric;
pub mod kind;
pub mod material;
pub mod reference;
pub mod scene;
pub mod template;
pub mod texture;
pub mod value;

pub use camera::{CameraData, CameraRef, FocusDistance};
pub use config::{RenderConfig, RenderParameters};
pub use error::{SchemaError, SchemaResult};
pub use geometric::{GeometricData, GeometricRef, Rotation};
pub use kind::{capitalize, EntityKind};
pub use material::{MaterialData, MaterialRef};
pub use reference::{Entity, RefOrInline, Table};
pub use scene::{SceneData, SceneRef};
pub use template::Template;
pub use texture::{TextureData, TextureRef};
pub use value::{Map, Value};

/// Default value for a tagged entity kind and type tag, as a dynamic value.
///
/// Used by editors when the `type` of an entry changes.
pub fn default_value_for(kind: EntityKind, tag: &str) -> SchemaResult<Value> {
    let value = match kind {
        EntityKind::Texture => texture::default_for(tag).map(|t| Value::from_typed(&t)),
        EntityKind::Material => material::default_for(tag).map(|m| Value::from_typed(&m)),
        EntityKind::Geometric => geometric::default_for(tag).map(|g| Value::from_typed(&g)),
        EntityKind::Camera | EntityKind::Scene => None,
    };

    match value {
        Some(encoded) => Ok(encoded?),
        None => Err(SchemaError::UnknownType {
            kind,
            tag: tag.to_string(),
        }),
    }
}

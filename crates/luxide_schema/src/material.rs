//! Material entities

use crate::builtin;
use crate::config::RenderConfig;
use crate::kind::EntityKind;
use crate::reference::{Entity, RefOrInline, Table};
use crate::texture::TextureRef;
use serde::{Deserialize, Serialize};

pub type MaterialRef = RefOrInline<MaterialData>;

/// A surface material. Every variant carries a reflectance and an
/// emittance texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialData {
    Dielectric {
        reflectance_texture: TextureRef,
        emittance_texture: TextureRef,
        index_of_refraction: f64,
    },
    Lambertian {
        reflectance_texture: TextureRef,
        emittance_texture: TextureRef,
    },
    Specular {
        reflectance_texture: TextureRef,
        emittance_texture: TextureRef,
        roughness: f64,
    },
}

impl MaterialData {
    /// Lambertian material from two texture fields
    pub fn lambertian(reflectance: impl Into<TextureRef>, emittance: impl Into<TextureRef>) -> Self {
        Self::Lambertian {
            reflectance_texture: reflectance.into(),
            emittance_texture: emittance.into(),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Dielectric { .. } => "dielectric",
            Self::Lambertian { .. } => "lambertian",
            Self::Specular { .. } => "specular",
        }
    }

    pub fn reflectance_texture(&self) -> &TextureRef {
        match self {
            Self::Dielectric {
                reflectance_texture,
                ..
            }
            | Self::Lambertian {
                reflectance_texture,
                ..
            }
            | Self::Specular {
                reflectance_texture,
                ..
            } => reflectance_texture,
        }
    }

    pub fn emittance_texture(&self) -> &TextureRef {
        match self {
            Self::Dielectric {
                emittance_texture, ..
            }
            | Self::Lambertian {
                emittance_texture, ..
            }
            | Self::Specular {
                emittance_texture, ..
            } => emittance_texture,
        }
    }

    /// Both texture fields, reflectance first
    pub fn texture_fields_mut(&mut self) -> [&mut TextureRef; 2] {
        match self {
            Self::Dielectric {
                reflectance_texture,
                emittance_texture,
                ..
            }
            | Self::Lambertian {
                reflectance_texture,
                emittance_texture,
            }
            | Self::Specular {
                reflectance_texture,
                emittance_texture,
                ..
            } => [reflectance_texture, emittance_texture],
        }
    }
}

impl Entity for MaterialData {
    const KIND: EntityKind = EntityKind::Material;

    fn type_tag(&self) -> Option<&'static str> {
        Some(self.tag())
    }

    fn fallback() -> Self {
        Self::lambertian(builtin::WHITE, builtin::BLACK)
    }

    fn table(config: &RenderConfig) -> &Table<Self> {
        &config.materials
    }

    fn table_mut(config: &mut RenderConfig) -> &mut Table<Self> {
        &mut config.materials
    }
}

/// Default material for a given type tag
pub fn default_for(tag: &str) -> Option<MaterialData> {
    match tag {
        "dielectric" => Some(MaterialData::Dielectric {
            reflectance_texture: builtin::WHITE.into(),
            emittance_texture: builtin::BLACK.into(),
            index_of_refraction: 1.0,
        }),
        "lambertian" => Some(MaterialData::fallback()),
        "specular" => Some(MaterialData::Specular {
            reflectance_texture: builtin::WHITE.into(),
            emittance_texture: builtin::BLACK.into(),
            roughness: 1.0,
        }),
        _ => None,
    }
}

//! Geometric entities
//!
//! ## Key Concepts
//!
//! - **Primitives** (`box`, `parallelogram`, `sphere`, `triangle`) and
//!   `obj_model` carry a material.
//! - **Composites** (`list`, `rotate_*`, `translate`) wrap other geometrics.
//! - **Volumes** (`constant_volume`) wrap a geometric boundary and carry a
//!   reflectance texture.

use crate::builtin;
use crate::config::RenderConfig;
use crate::kind::EntityKind;
use crate::material::MaterialRef;
use crate::reference::{Entity, RefOrInline, Table};
use crate::texture::TextureRef;
use serde::{Deserialize, Serialize};

pub type GeometricRef = RefOrInline<GeometricData>;

/// Rotation of a wrapped geometric around one axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub geometric: GeometricRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degrees: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radians: Option<f64>,
    /// Pivot point, origin when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub around: Option<[f64; 3]>,
}

impl Rotation {
    /// Rotation angle in radians. Degrees win when both are given.
    pub fn angle_radians(&self) -> f64 {
        match (self.degrees, self.radians) {
            (Some(degrees), _) => degrees.to_radians(),
            (None, Some(radians)) => radians,
            (None, None) => 0.0,
        }
    }
}

/// A geometric, discriminated by its `type` tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeometricData {
    /// Axis-aligned box spanned by two corners
    Box {
        a: [f64; 3],
        b: [f64; 3],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_culled: Option<bool>,
        material: MaterialRef,
    },
    List {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        use_bvh: Option<bool>,
        geometrics: Vec<GeometricRef>,
    },
    ObjModel {
        filename: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        origin: Option<[f64; 3]>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scale: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        recalculate_normals: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        use_bvh: Option<bool>,
        material: MaterialRef,
    },
    RotateX(Rotation),
    RotateY(Rotation),
    RotateZ(Rotation),
    Translate {
        geometric: GeometricRef,
        translation: [f64; 3],
    },
    Parallelogram {
        lower_left: [f64; 3],
        u: [f64; 3],
        v: [f64; 3],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_culled: Option<bool>,
        material: MaterialRef,
    },
    Sphere {
        center: [f64; 3],
        radius: f64,
        material: MaterialRef,
    },
    Triangle {
        a: [f64; 3],
        b: [f64; 3],
        c: [f64; 3],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        a_normal: Option<[f64; 3]>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        b_normal: Option<[f64; 3]>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        c_normal: Option<[f64; 3]>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_culled: Option<bool>,
        material: MaterialRef,
    },
    /// Participating medium of constant density bounded by a geometric
    ConstantVolume {
        geometric: GeometricRef,
        density: f64,
        reflectance_texture: TextureRef,
    },
}

impl GeometricData {
    /// Axis-aligned box with the given material
    pub fn aabb(a: [f64; 3], b: [f64; 3], material: impl Into<MaterialRef>) -> Self {
        Self::Box {
            a,
            b,
            is_culled: None,
            material: material.into(),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Box { .. } => "box",
            Self::List { .. } => "list",
            Self::ObjModel { .. } => "obj_model",
            Self::RotateX(_) => "rotate_x",
            Self::RotateY(_) => "rotate_y",
            Self::RotateZ(_) => "rotate_z",
            Self::Translate { .. } => "translate",
            Self::Parallelogram { .. } => "parallelogram",
            Self::Sphere { .. } => "sphere",
            Self::Triangle { .. } => "triangle",
            Self::ConstantVolume { .. } => "constant_volume",
        }
    }

    /// Whether this geometric wraps other geometrics
    pub fn is_composite(&self) -> bool {
        !self.geometric_fields().is_empty()
    }

    /// Material field of leaf shapes
    pub fn material(&self) -> Option<&MaterialRef> {
        match self {
            Self::Box { material, .. }
            | Self::ObjModel { material, .. }
            | Self::Parallelogram { material, .. }
            | Self::Sphere { material, .. }
            | Self::Triangle { material, .. } => Some(material),
            _ => None,
        }
    }

    pub fn material_mut(&mut self) -> Option<&mut MaterialRef> {
        match self {
            Self::Box { material, .. }
            | Self::ObjModel { material, .. }
            | Self::Parallelogram { material, .. }
            | Self::Sphere { material, .. }
            | Self::Triangle { material, .. } => Some(material),
            _ => None,
        }
    }

    /// Wrapped geometric fields of composites, in document order
    pub fn geometric_fields(&self) -> Vec<&GeometricRef> {
        match self {
            Self::List { geometrics, .. } => geometrics.iter().collect(),
            Self::RotateX(rotation) | Self::RotateY(rotation) | Self::RotateZ(rotation) => {
                vec![&rotation.geometric]
            }
            Self::Translate { geometric, .. } | Self::ConstantVolume { geometric, .. } => {
                vec![geometric]
            }
            _ => Vec::new(),
        }
    }

    pub fn geometric_fields_mut(&mut self) -> Vec<&mut GeometricRef> {
        match self {
            Self::List { geometrics, .. } => geometrics.iter_mut().collect(),
            Self::RotateX(rotation) | Self::RotateY(rotation) | Self::RotateZ(rotation) => {
                vec![&mut rotation.geometric]
            }
            Self::Translate { geometric, .. } | Self::ConstantVolume { geometric, .. } => {
                vec![geometric]
            }
            _ => Vec::new(),
        }
    }

    /// Texture field carried directly by volumes
    pub fn texture_field(&self) -> Option<&TextureRef> {
        match self {
            Self::ConstantVolume {
                reflectance_texture,
                ..
            } => Some(reflectance_texture),
            _ => None,
        }
    }

    pub fn texture_field_mut(&mut self) -> Option<&mut TextureRef> {
        match self {
            Self::ConstantVolume {
                reflectance_texture,
                ..
            } => Some(reflectance_texture),
            _ => None,
        }
    }
}

impl Entity for GeometricData {
    const KIND: EntityKind = EntityKind::Geometric;

    fn type_tag(&self) -> Option<&'static str> {
        Some(self.tag())
    }

    fn fallback() -> Self {
        builtin::unit_box()
    }

    fn table(config: &RenderConfig) -> &Table<Self> {
        &config.geometrics
    }

    fn table_mut(config: &mut RenderConfig) -> &mut Table<Self> {
        &mut config.geometrics
    }
}

/// Default geometric for a given type tag
pub fn default_for(tag: &str) -> Option<GeometricData> {
    let rotation = || Rotation {
        geometric: builtin::UNIT_BOX.into(),
        degrees: Some(0.0),
        radians: None,
        around: None,
    };

    let geometric = match tag {
        "box" => builtin::unit_box(),
        "list" => GeometricData::List {
            use_bvh: Some(false),
            geometrics: Vec::new(),
        },
        "obj_model" => GeometricData::ObjModel {
            filename: String::new(),
            origin: None,
            scale: None,
            recalculate_normals: None,
            use_bvh: None,
            material: builtin::LAMBERTIAN_WHITE.into(),
        },
        "rotate_x" => GeometricData::RotateX(rotation()),
        "rotate_y" => GeometricData::RotateY(rotation()),
        "rotate_z" => GeometricData::RotateZ(rotation()),
        "translate" => GeometricData::Translate {
            geometric: builtin::UNIT_BOX.into(),
            translation: [0.0, 0.0, 0.0],
        },
        "parallelogram" => GeometricData::Parallelogram {
            lower_left: [-0.5, 0.0, 0.5],
            u: [1.0, 0.0, 0.0],
            v: [0.0, 0.0, -1.0],
            is_culled: None,
            material: builtin::LAMBERTIAN_WHITE.into(),
        },
        "sphere" => GeometricData::Sphere {
            center: [0.0, 0.0, 0.0],
            radius: 1.0,
            material: builtin::LAMBERTIAN_WHITE.into(),
        },
        "triangle" => GeometricData::Triangle {
            a: [-0.5, 0.0, 0.0],
            b: [0.5, 0.0, 0.0],
            c: [0.0, 1.0, 0.0],
            a_normal: None,
            b_normal: None,
            c_normal: None,
            is_culled: None,
            material: builtin::LAMBERTIAN_WHITE.into(),
        },
        "constant_volume" => GeometricData::ConstantVolume {
            geometric: builtin::UNIT_BOX.into(),
            density: 0.1,
            reflectance_texture: builtin::WHITE.into(),
        },
        _ => return None,
    };
    Some(geometric)
}

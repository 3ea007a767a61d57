//! Entity kinds and their shape predicates
//!
//! Every cross-entity field in a render config holds either a name or an
//! inline entity. [`EntityKind::matches`] is the single test used to tell
//! the two apart on raw data: a bare string is never "of a kind".

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Recognized texture type tags
pub const TEXTURE_TAGS: &[&str] = &["checker", "image", "color", "solid_color"];

/// Recognized material type tags
pub const MATERIAL_TAGS: &[&str] = &["dielectric", "lambertian", "specular"];

/// Recognized geometric type tags
pub const GEOMETRIC_TAGS: &[&str] = &[
    "box",
    "list",
    "obj_model",
    "rotate_x",
    "rotate_y",
    "rotate_z",
    "translate",
    "parallelogram",
    "sphere",
    "triangle",
    "constant_volume",
];

/// Fields every camera object carries
pub const CAMERA_FIELDS: &[&str] = &[
    "vertical_field_of_view_degrees",
    "eye_location",
    "target_location",
    "view_up",
    "defocus_angle_degrees",
    "focus_distance",
];

/// Fields every scene object carries
pub const SCENE_FIELDS: &[&str] = &["geometrics", "camera", "background_color"];

/// The five kinds of entity stored in render config tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Texture,
    Material,
    Geometric,
    Camera,
    Scene,
}

impl EntityKind {
    /// All kinds, leaves of the reference graph first
    pub const ALL: [EntityKind; 5] = [
        Self::Texture,
        Self::Material,
        Self::Geometric,
        Self::Camera,
        Self::Scene,
    ];

    /// Name of the top-level table holding this kind
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Texture => "textures",
            Self::Material => "materials",
            Self::Geometric => "geometrics",
            Self::Camera => "cameras",
            Self::Scene => "scenes",
        }
    }

    /// Look up a kind by its table name
    pub fn from_table_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.table_name() == name)
    }

    /// Type tags recognized for this kind. Empty for untagged kinds.
    pub fn tags(self) -> &'static [&'static str] {
        match self {
            Self::Texture => TEXTURE_TAGS,
            Self::Material => MATERIAL_TAGS,
            Self::Geometric => GEOMETRIC_TAGS,
            Self::Camera | Self::Scene => &[],
        }
    }

    /// Whether entries of this kind are discriminated by a `type` field
    pub fn is_tagged(self) -> bool {
        !self.tags().is_empty()
    }

    /// Whether a raw value is an inline entity of this kind.
    pub fn matches(self, value: &Value) -> bool {
        let Some(obj) = value.as_object() else {
            return false;
        };

        match self {
            Self::Texture | Self::Material | Self::Geometric => obj
                .get("type")
                .and_then(Value::as_str)
                .is_some_and(|tag| self.tags().contains(&tag)),
            Self::Camera => CAMERA_FIELDS.iter().all(|f| obj.contains_key(*f)),
            Self::Scene => SCENE_FIELDS.iter().all(|f| obj.contains_key(*f)),
        }
    }

    /// Base name used when allocating a name for an extracted entity.
    ///
    /// Tagged kinds use their capitalized type tag (`"Box"`, `"Lambertian"`);
    /// cameras and scenes use a fixed literal.
    pub fn base_name(self, tag: Option<&str>) -> String {
        match (self, tag) {
            (Self::Camera, _) => "Camera".to_string(),
            (Self::Scene, _) => "Scene".to_string(),
            (_, Some(tag)) => capitalize(tag),
            (kind, None) => capitalize(&kind.to_string()),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Texture => "texture",
            Self::Material => "material",
            Self::Geometric => "geometric",
            Self::Camera => "camera",
            Self::Scene => "scene",
        };
        write!(f, "{}", name)
    }
}

/// Uppercase the first character of a string
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Value {
        Value::from_json(text).unwrap()
    }

    #[test]
    fn test_tagged_kind_predicates() {
        let sphere = parse(r#"{"type": "sphere", "center": [0, 0, 0], "radius": 1, "material": "M"}"#);
        assert!(EntityKind::Geometric.matches(&sphere));
        assert!(!EntityKind::Material.matches(&sphere));

        let lambertian = parse(r#"{"type": "lambertian"}"#);
        assert!(EntityKind::Material.matches(&lambertian));

        let unknown = parse(r#"{"type": "teapot"}"#);
        assert!(!EntityKind::Geometric.matches(&unknown));

        let untyped = parse(r#"{"type": 3}"#);
        assert!(!EntityKind::Texture.matches(&untyped));
    }

    #[test]
    fn test_bare_names_never_match() {
        for kind in EntityKind::ALL {
            assert!(!kind.matches(&Value::from("box")));
            assert!(!kind.matches(&Value::Null));
        }
    }

    #[test]
    fn test_camera_and_scene_predicates() {
        let camera = parse(
            r#"{"vertical_field_of_view_degrees": 40, "eye_location": [0,0,-10],
                "target_location": [0,0,0], "view_up": [0,1,0],
                "defocus_angle_degrees": 0, "focus_distance": "eye_to_target"}"#,
        );
        assert!(EntityKind::Camera.matches(&camera));

        let partial = parse(r#"{"vertical_field_of_view_degrees": 40}"#);
        assert!(!EntityKind::Camera.matches(&partial));

        let scene = parse(r#"{"geometrics": [], "camera": "Camera 1", "background_color": [0,0,0]}"#);
        assert!(EntityKind::Scene.matches(&scene));
        assert!(!EntityKind::Scene.matches(&parse(r#"{"geometrics": []}"#)));
    }

    #[test]
    fn test_table_names_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_table_name(kind.table_name()), Some(kind));
        }
        assert_eq!(EntityKind::from_table_name("parameters"), None);
    }

    #[test]
    fn test_base_names() {
        assert_eq!(EntityKind::Geometric.base_name(Some("box")), "Box");
        assert_eq!(EntityKind::Geometric.base_name(Some("obj_model")), "Obj_model");
        assert_eq!(EntityKind::Camera.base_name(None), "Camera");
        assert_eq!(EntityKind::Scene.base_name(Some("ignored")), "Scene");
        assert_eq!(capitalize(""), "");
    }
}

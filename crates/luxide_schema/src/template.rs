//! Starter documents
//!
//! Templates are already normalized: every cross-entity field is a name
//! and built-in resources are present.

use crate::camera::{CameraData, FocusDistance};
use crate::config::{RenderConfig, RenderParameters};
use crate::error::SchemaError;
use crate::geometric::{GeometricData, Rotation};
use crate::material::MaterialData;
use crate::scene::{SceneData, SceneRef};
use crate::texture::TextureData;
use indexmap::IndexMap;

/// Built-in starter documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Template {
    /// One empty scene and a camera
    Empty,
    /// The classic Cornell box
    #[default]
    CornellBox,
}

impl Template {
    pub const ALL: [Template; 2] = [Self::Empty, Self::CornellBox];

    pub fn name(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::CornellBox => "cornell-box",
        }
    }

    /// Build the document for this template
    pub fn build(self) -> RenderConfig {
        let config = match self {
            Self::Empty => empty(),
            Self::CornellBox => cornell_box(),
        };
        config.with_builtins()
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Template {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "empty" => Ok(Self::Empty),
            "cornell-box" | "cornell_box" | "cornell" => Ok(Self::CornellBox),
            _ => Err(SchemaError::UnknownTemplate(s.to_string())),
        }
    }
}

fn document(name: &str, scene_name: &str, scene: SceneData, camera: CameraData) -> RenderConfig {
    let mut config = RenderConfig::new(name, scene);
    if let Some(scene) = config.active_scene.replace_with_ref(scene_name) {
        config.scenes.insert(scene_name.to_string(), scene);
    }
    config.cameras.insert("Camera 1".to_string(), camera);
    config
}

fn empty() -> RenderConfig {
    let scene = SceneData {
        geometrics: Vec::new(),
        use_bvh: true,
        camera: "Camera 1".into(),
        background_color: [0.0, 0.0, 0.0],
    };
    document("Empty", "Scene 1", scene, CameraData::default())
}

fn wall(lower_left: [f64; 3], u: [f64; 3], v: [f64; 3], material: &str) -> GeometricData {
    GeometricData::Parallelogram {
        lower_left,
        u,
        v,
        is_culled: Some(false),
        material: material.into(),
    }
}

fn cornell_box() -> RenderConfig {
    let scene = SceneData {
        geometrics: [
            "Far Left Box",
            "Near Right Box",
            "Left Wall",
            "Right Wall",
            "Floor",
            "Ceiling",
            "Ceiling Light",
            "Far Wall",
            "Near Wall",
        ]
        .into_iter()
        .map(Into::into)
        .collect(),
        use_bvh: true,
        camera: "Camera 1".into(),
        background_color: [0.0, 0.0, 0.0],
    };
    let camera = CameraData {
        vertical_field_of_view_degrees: 40.0,
        eye_location: [5.0, 5.0, 14.4144],
        target_location: [5.0, 5.0, 0.0],
        view_up: [0.0, 1.0, 0.0],
        defocus_angle_degrees: 0.0,
        focus_distance: FocusDistance::EyeToTarget,
    };

    let mut config = document("Cornell Box", "Cornell Box", scene, camera);
    config.parameters = RenderParameters::default();

    let mut geometrics = IndexMap::new();
    geometrics.insert(
        "Far Left Box".to_string(),
        GeometricData::RotateY(Rotation {
            geometric: "Far Left Box - Unrotated".into(),
            degrees: Some(15.0),
            radians: None,
            around: Some([3.5, 0.0, -6.5]),
        }),
    );
    geometrics.insert(
        "Far Left Box - Unrotated".to_string(),
        GeometricData::aabb([2.0, 0.0, -5.0], [5.0, 6.0, -8.0], "White"),
    );
    geometrics.insert(
        "Near Right Box".to_string(),
        GeometricData::RotateY(Rotation {
            geometric: "Near Right Box - Unrotated".into(),
            degrees: Some(342.0),
            radians: None,
            around: Some([6.5, 0.0, -3.5]),
        }),
    );
    geometrics.insert(
        "Near Right Box - Unrotated".to_string(),
        GeometricData::aabb([5.0, 0.0, -2.0], [8.0, 3.0, -5.0], "White"),
    );
    geometrics.insert(
        "Left Wall".to_string(),
        wall([0.0, 0.0, 0.0], [0.0, 0.0, -10.0], [0.0, 10.0, 0.0], "Green"),
    );
    geometrics.insert(
        "Right Wall".to_string(),
        wall([10.0, 0.0, -10.0], [0.0, 0.0, 10.0], [0.0, 10.0, 0.0], "Red"),
    );
    geometrics.insert(
        "Floor".to_string(),
        wall([0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [0.0, 0.0, -10.0], "White"),
    );
    geometrics.insert(
        "Ceiling".to_string(),
        wall([0.0, 10.0, -10.0], [10.0, 0.0, 0.0], [0.0, 0.0, 10.0], "White"),
    );
    geometrics.insert(
        "Ceiling Light".to_string(),
        wall([3.5, 9.99, -6.5], [3.0, 0.0, 0.0], [0.0, 0.0, 3.0], "White Light"),
    );
    geometrics.insert(
        "Far Wall".to_string(),
        wall([0.0, 0.0, -10.0], [10.0, 0.0, 0.0], [0.0, 10.0, 0.0], "White"),
    );
    geometrics.insert(
        "Near Wall".to_string(),
        GeometricData::Parallelogram {
            lower_left: [10.0, 0.0, 0.0],
            u: [-10.0, 0.0, 0.0],
            v: [0.0, 10.0, 0.0],
            is_culled: Some(true),
            material: "White".into(),
        },
    );
    config.geometrics = geometrics;

    for (name, reflectance, emittance) in [
        ("White", "White", "Black"),
        ("White Light", "Black", "White Light"),
        ("Red", "Red", "Black"),
        ("Green", "Green", "Black"),
    ] {
        config
            .materials
            .insert(name.to_string(), MaterialData::lambertian(reflectance, emittance));
    }

    for (name, color) in [
        ("Black", [0.0, 0.0, 0.0]),
        ("White", [0.73, 0.73, 0.73]),
        ("White Light", [7.0, 7.0, 7.0]),
        ("Red", [0.65, 0.05, 0.05]),
        ("Green", [0.12, 0.45, 0.15]),
    ] {
        config
            .textures
            .insert(name.to_string(), TextureData::color(color));
    }

    config
}

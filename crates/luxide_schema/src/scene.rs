//! Scene entities

use crate::camera::{CameraData, CameraRef};
use crate::config::RenderConfig;
use crate::geometric::GeometricRef;
use crate::kind::EntityKind;
use crate::reference::{Entity, RefOrInline, Table};
use serde::{Deserialize, Serialize};

pub type SceneRef = RefOrInline<SceneData>;

fn default_use_bvh() -> bool {
    true
}

/// A renderable scene: geometry, a camera and a background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneData {
    pub geometrics: Vec<GeometricRef>,
    #[serde(default = "default_use_bvh")]
    pub use_bvh: bool,
    pub camera: CameraRef,
    pub background_color: [f64; 3],
}

impl Default for SceneData {
    fn default() -> Self {
        Self {
            geometrics: Vec::new(),
            use_bvh: true,
            camera: RefOrInline::inline(CameraData::default()),
            background_color: [0.0, 0.0, 0.0],
        }
    }
}

impl Entity for SceneData {
    const KIND: EntityKind = EntityKind::Scene;

    fn fallback() -> Self {
        Self::default()
    }

    fn table(config: &RenderConfig) -> &Table<Self> {
        &config.scenes
    }

    fn table_mut(config: &mut RenderConfig) -> &mut Table<Self> {
        &mut config.scenes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_bvh_defaults_on() {
        let scene: SceneData = serde_json::from_str(
            r#"{"geometrics": ["Floor"], "camera": "Camera 1", "background_color": [0, 0, 0]}"#,
        )
        .unwrap();
        assert!(scene.use_bvh);
        assert_eq!(scene.geometrics[0].name(), Some("Floor"));
        assert_eq!(scene.camera.name(), Some("Camera 1"));
    }

    #[test]
    fn test_default_scene_has_inline_camera() {
        let scene = SceneData::default();
        assert!(scene.camera.is_inline());
        assert!(scene.geometrics.is_empty());
    }
}

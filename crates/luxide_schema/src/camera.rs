//! Camera entities

use crate::config::RenderConfig;
use crate::kind::EntityKind;
use crate::reference::{Entity, RefOrInline, Table};
use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize, Serializer};

pub type CameraRef = RefOrInline<CameraData>;

const EYE_TO_TARGET: &str = "eye_to_target";

/// Focus distance of a camera
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FocusDistance {
    /// Derived from the distance between eye and target
    #[default]
    EyeToTarget,
    /// Explicit distance
    Exact(f64),
}

impl FocusDistance {
    /// Resolve to a concrete distance for the given eye and target
    pub fn resolve(&self, eye: [f64; 3], target: [f64; 3]) -> f64 {
        match self {
            Self::EyeToTarget => eye
                .iter()
                .zip(target.iter())
                .map(|(e, t)| (e - t) * (e - t))
                .sum::<f64>()
                .sqrt(),
            Self::Exact(distance) => *distance,
        }
    }
}

impl Serialize for FocusDistance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::EyeToTarget => serializer.serialize_str(EYE_TO_TARGET),
            Self::Exact(distance) => serializer.serialize_f64(*distance),
        }
    }
}

impl<'de> Deserialize<'de> for FocusDistance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(distance) => Ok(Self::Exact(distance)),
            Raw::Text(text) if text == EYE_TO_TARGET => Ok(Self::EyeToTarget),
            Raw::Text(text) => Err(D::Error::custom(format!(
                "focus_distance must be a number or \"{}\", got \"{}\"",
                EYE_TO_TARGET, text
            ))),
        }
    }
}

/// A pinhole/thin-lens camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraData {
    pub vertical_field_of_view_degrees: f64,
    pub eye_location: [f64; 3],
    pub target_location: [f64; 3],
    pub view_up: [f64; 3],
    pub defocus_angle_degrees: f64,
    pub focus_distance: FocusDistance,
}

impl Default for CameraData {
    fn default() -> Self {
        Self {
            vertical_field_of_view_degrees: 40.0,
            eye_location: [0.0, 0.0, -10.0],
            target_location: [0.0, 0.0, 0.0],
            view_up: [0.0, 1.0, 0.0],
            defocus_angle_degrees: 0.0,
            focus_distance: FocusDistance::EyeToTarget,
        }
    }
}

impl Entity for CameraData {
    const KIND: EntityKind = EntityKind::Camera;

    fn fallback() -> Self {
        Self::default()
    }

    fn table(config: &RenderConfig) -> &Table<Self> {
        &config.cameras
    }

    fn table_mut(config: &mut RenderConfig) -> &mut Table<Self> {
        &mut config.cameras
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_distance_forms() {
        let derived: FocusDistance = serde_json::from_str(r#""eye_to_target""#).unwrap();
        assert_eq!(derived, FocusDistance::EyeToTarget);
        let exact: FocusDistance = serde_json::from_str("12.5").unwrap();
        assert_eq!(exact, FocusDistance::Exact(12.5));
        assert!(serde_json::from_str::<FocusDistance>(r#""far""#).is_err());

        assert_eq!(serde_json::to_string(&derived).unwrap(), r#""eye_to_target""#);
    }

    #[test]
    fn test_focus_distance_resolution() {
        let camera = CameraData::default();
        let distance = camera
            .focus_distance
            .resolve(camera.eye_location, camera.target_location);
        assert!((distance - 10.0).abs() < 1e-12);
        assert_eq!(FocusDistance::Exact(3.0).resolve([0.0; 3], [0.0; 3]), 3.0);
    }

    #[test]
    fn test_camera_base_name() {
        assert_eq!(CameraData::default().base_name(), "Camera");
    }
}

//! Texture entities

use crate::builtin;
use crate::config::RenderConfig;
use crate::kind::EntityKind;
use crate::reference::{Entity, RefOrInline, Table};
use serde::{Deserialize, Serialize};

pub type TextureRef = RefOrInline<TextureData>;

fn default_gamma() -> f64 {
    1.0
}

/// A texture, discriminated by its `type` tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextureData {
    /// 3D checker pattern alternating between two textures
    Checker {
        scale: f64,
        even_texture: TextureRef,
        odd_texture: TextureRef,
    },
    /// Image file sampled by UV
    Image {
        filename: String,
        #[serde(default = "default_gamma")]
        gamma: f64,
    },
    /// Solid color. Components above 1.0 express emissive intensity.
    #[serde(alias = "solid_color")]
    Color { color: [f64; 3] },
}

impl TextureData {
    pub fn color(color: [f64; 3]) -> Self {
        Self::Color { color }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Checker { .. } => "checker",
            Self::Image { .. } => "image",
            Self::Color { .. } => "color",
        }
    }

    /// Sub-texture fields, even first
    pub fn texture_fields(&self) -> Vec<&TextureRef> {
        match self {
            Self::Checker {
                even_texture,
                odd_texture,
                ..
            } => vec![even_texture, odd_texture],
            _ => Vec::new(),
        }
    }

    pub fn texture_fields_mut(&mut self) -> Vec<&mut TextureRef> {
        match self {
            Self::Checker {
                even_texture,
                odd_texture,
                ..
            } => vec![even_texture, odd_texture],
            _ => Vec::new(),
        }
    }
}

impl Entity for TextureData {
    const KIND: EntityKind = EntityKind::Texture;

    fn type_tag(&self) -> Option<&'static str> {
        Some(self.tag())
    }

    fn fallback() -> Self {
        Self::color([1.0, 1.0, 1.0])
    }

    fn table(config: &RenderConfig) -> &Table<Self> {
        &config.textures
    }

    fn table_mut(config: &mut RenderConfig) -> &mut Table<Self> {
        &mut config.textures
    }
}

/// Default texture for a given type tag
pub fn default_for(tag: &str) -> Option<TextureData> {
    match tag {
        "checker" => Some(TextureData::Checker {
            scale: 1.0,
            even_texture: builtin::WHITE.into(),
            odd_texture: builtin::BLACK.into(),
        }),
        "image" => Some(TextureData::Image {
            filename: String::new(),
            gamma: default_gamma(),
        }),
        "color" | "solid_color" => Some(TextureData::fallback()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_solid_color_tag() {
        let texture: TextureData =
            serde_json::from_str(r#"{"type": "solid_color", "color": [7, 7, 7]}"#).unwrap();
        assert_eq!(texture, TextureData::color([7.0, 7.0, 7.0]));
        let encoded = serde_json::to_string(&texture).unwrap();
        assert!(encoded.contains(r#""type":"color""#));
    }

    #[test]
    fn test_checker_sub_textures() {
        let texture: TextureData = serde_json::from_str(
            r#"{"type": "checker", "scale": 0.5, "even_texture": "White",
                "odd_texture": {"type": "color", "color": [0, 0, 0]}}"#,
        )
        .unwrap();
        let fields = texture.texture_fields();
        assert_eq!(fields[0].name(), Some("White"));
        assert!(fields[1].is_inline());
    }

    #[test]
    fn test_image_gamma_defaults() {
        let texture: TextureData =
            serde_json::from_str(r#"{"type": "image", "filename": "earth.jpg"}"#).unwrap();
        assert_eq!(
            texture,
            TextureData::Image {
                filename: "earth.jpg".to_string(),
                gamma: 1.0
            }
        );
    }

    #[test]
    fn test_defaults_per_tag() {
        for tag in crate::kind::TEXTURE_TAGS {
            assert!(default_for(tag).is_some());
        }
        assert!(default_for("noise").is_none());
    }
}

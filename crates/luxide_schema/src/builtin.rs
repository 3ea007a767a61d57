//! Built-in resources
//!
//! Every document can reference a small set of engine-supplied entries.
//! Their names start with [`PREFIX`] and they are only inserted when the
//! document does not define an entry of the same name.

use crate::config::RenderConfig;
use crate::geometric::GeometricData;
use crate::material::MaterialData;
use crate::texture::TextureData;

/// Name prefix reserved for built-in resources
pub const PREFIX: &str = "__";

pub const WHITE: &str = "__white";
pub const BLACK: &str = "__black";
pub const LAMBERTIAN_WHITE: &str = "__lambertian_white";
pub const LAMBERTIAN_BLACK: &str = "__lambertian_black";
pub const UNIT_BOX: &str = "__unit_box";

/// Whether a table name is reserved for built-ins
pub fn is_builtin(name: &str) -> bool {
    name.starts_with(PREFIX)
}

/// Unit box standing on the origin, white lambertian
pub fn unit_box() -> GeometricData {
    GeometricData::Box {
        a: [-0.5, 0.0, 0.5],
        b: [0.5, 1.0, -0.5],
        is_culled: Some(false),
        material: LAMBERTIAN_WHITE.into(),
    }
}

pub fn textures() -> Vec<(&'static str, TextureData)> {
    vec![
        (WHITE, TextureData::color([1.0, 1.0, 1.0])),
        (BLACK, TextureData::color([0.0, 0.0, 0.0])),
    ]
}

pub fn materials() -> Vec<(&'static str, MaterialData)> {
    vec![
        (LAMBERTIAN_WHITE, MaterialData::lambertian(WHITE, BLACK)),
        (LAMBERTIAN_BLACK, MaterialData::lambertian(BLACK, BLACK)),
    ]
}

pub fn geometrics() -> Vec<(&'static str, GeometricData)> {
    vec![(UNIT_BOX, unit_box())]
}

/// Insert every built-in the config does not already define.
///
/// Returns the number of entries added.
pub fn insert_missing(config: &mut RenderConfig) -> usize {
    let mut added = 0;

    for (name, texture) in textures() {
        if !config.textures.contains_key(name) {
            config.textures.insert(name.to_string(), texture);
            added += 1;
        }
    }
    for (name, material) in materials() {
        if !config.materials.contains_key(name) {
            config.materials.insert(name.to_string(), material);
            added += 1;
        }
    }
    for (name, geometric) in geometrics() {
        if !config.geometrics.contains_key(name) {
            config.geometrics.insert(name.to_string(), geometric);
            added += 1;
        }
    }

    if added > 0 {
        log::debug!("Inserted {} built-in resources into '{}'", added, config.name);
    }
    added
}

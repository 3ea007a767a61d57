//! Graph normalization
//!
//! Rewrites a render config so that every cross-entity field is a name.
//! Inline entities are extracted into their tables under fresh names
//! allocated by [`next_unique_name`].
//!
//! ## Ordering
//!
//! Extraction is post-order: an inline entity's own inline children are
//! extracted before the entity is stored. Within one entity, fields are
//! visited in document order (checker: even then odd; material:
//! reflectance then emittance; scene: geometrics then camera). Tables are
//! visited textures, materials, geometrics, cameras, scenes, then the
//! root's active scene.

use crate::names::next_unique_name;
use crate::references::{entry, Link, Links};
use luxide_schema::{
    CameraData, Entity, EntityKind, GeometricData, MaterialData, RefOrInline, RenderConfig,
    SceneData, TextureData,
};

/// Entities extracted during a normalization pass, in extraction order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub extracted: Vec<(EntityKind, String)>,
}

impl NormalizeReport {
    pub fn is_empty(&self) -> bool {
        self.extracted.is_empty()
    }

    pub fn len(&self) -> usize {
        self.extracted.len()
    }

    /// Names extracted into the table of `kind`
    pub fn names(&self, kind: EntityKind) -> Vec<&str> {
        self.extracted
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, name)| name.as_str())
            .collect()
    }

    fn record(&mut self, kind: EntityKind, name: &str) {
        log::debug!("Extracted inline {} as '{}'", kind, name);
        self.extracted.push((kind, name.to_string()));
    }
}

/// Entities whose inline children can be extracted
pub trait Normalize: Entity + Links {
    /// Extract every inline child of this entity into `config`
    fn normalize_children(&mut self, config: &mut RenderConfig, report: &mut NormalizeReport);

    /// Whether any direct field holds an inline entity
    fn has_inline(&self) -> bool {
        self.links()
            .iter()
            .any(|link| matches!(link, Link::Inline(..)))
    }
}

/// Replace an inline field with a reference to a freshly stored entry.
fn extract<T: Normalize>(
    field: &mut RefOrInline<T>,
    config: &mut RenderConfig,
    report: &mut NormalizeReport,
) {
    let RefOrInline::Inline(_) = field else {
        return;
    };
    let Some(mut entity) = field.replace_with_ref(String::new()) else {
        return;
    };

    entity.normalize_children(config, report);

    let name = next_unique_name(T::table(config), &entity.base_name());
    T::table_mut(config).insert(name.clone(), entity);
    report.record(T::KIND, &name);
    *field = RefOrInline::Ref(name);
}

impl Normalize for TextureData {
    fn normalize_children(&mut self, config: &mut RenderConfig, report: &mut NormalizeReport) {
        for field in self.texture_fields_mut() {
            extract(field, config, report);
        }
    }
}

impl Normalize for MaterialData {
    fn normalize_children(&mut self, config: &mut RenderConfig, report: &mut NormalizeReport) {
        for field in self.texture_fields_mut() {
            extract(field, config, report);
        }
    }
}

impl Normalize for GeometricData {
    fn normalize_children(&mut self, config: &mut RenderConfig, report: &mut NormalizeReport) {
        for field in self.geometric_fields_mut() {
            extract(field, config, report);
        }
        if let Some(material) = self.material_mut() {
            extract(material, config, report);
        }
        if let Some(texture) = self.texture_field_mut() {
            extract(texture, config, report);
        }
    }
}

impl Normalize for CameraData {
    fn normalize_children(&mut self, _config: &mut RenderConfig, _report: &mut NormalizeReport) {}
}

impl Normalize for SceneData {
    fn normalize_children(&mut self, config: &mut RenderConfig, report: &mut NormalizeReport) {
        for field in self.geometrics.iter_mut() {
            extract(field, config, report);
        }
        extract(&mut self.camera, config, report);
    }
}

fn normalize_table<T: Normalize>(config: &mut RenderConfig, report: &mut NormalizeReport) {
    let names: Vec<String> = T::table(config).keys().cloned().collect();

    for name in names {
        let mut entity = match T::table(config).get(&name) {
            Some(entity) if entity.has_inline() => entity.clone(),
            _ => continue,
        };
        entity.normalize_children(config, report);
        T::table_mut(config).insert(name, entity);
    }
}

/// Normalize a render config in place.
///
/// Running this on an already-normalized config extracts nothing.
pub fn normalize(config: &mut RenderConfig) -> NormalizeReport {
    let mut report = NormalizeReport::default();

    normalize_table::<TextureData>(config, &mut report);
    normalize_table::<MaterialData>(config, &mut report);
    normalize_table::<GeometricData>(config, &mut report);
    normalize_table::<CameraData>(config, &mut report);
    normalize_table::<SceneData>(config, &mut report);

    let mut active_scene =
        std::mem::replace(&mut config.active_scene, RefOrInline::Ref(String::new()));
    extract(&mut active_scene, config, &mut report);
    config.active_scene = active_scene;

    if !report.is_empty() {
        log::debug!(
            "Normalized '{}': extracted {} inline entities",
            config.name,
            report.len()
        );
    }
    report
}

/// Normalize a copy of `config`
pub fn normalized(config: &RenderConfig) -> (RenderConfig, NormalizeReport) {
    let mut copy = config.clone();
    let report = normalize(&mut copy);
    (copy, report)
}

/// Whether every cross-entity field is a name present in its table
pub fn is_normalized(config: &RenderConfig) -> bool {
    fn all_named(config: &RenderConfig, source: &dyn Links) -> bool {
        source.links().into_iter().all(|link| match link {
            Link::Named(kind, name) => config.contains(kind, name),
            Link::Inline(..) => false,
        })
    }

    let root_ok = match &config.active_scene {
        RefOrInline::Ref(name) => config.scenes.contains_key(name),
        RefOrInline::Inline(_) => false,
    };

    root_ok
        && EntityKind::ALL.into_iter().all(|kind| {
            config
                .names(kind)
                .into_iter()
                .filter_map(|name| entry(config, kind, name))
                .all(|source| all_named(config, source))
        })
}

//! Reference queries and orphan reclamation
//!
//! [`Links`] enumerates the outgoing cross-entity fields of an entity. It
//! backs the referenced-name queries used by editors, the well-formedness
//! check and the mark-and-sweep [`sweep_orphans`] pass.

use luxide_schema::builtin;
use luxide_schema::{
    CameraData, Entity, EntityKind, GeometricData, MaterialData, RefOrInline, RenderConfig,
    SceneData, TextureData,
};
use std::collections::HashSet;

/// One outgoing cross-entity field
pub enum Link<'a> {
    /// Reference to a table entry
    Named(EntityKind, &'a str),
    /// Entity embedded in place
    Inline(EntityKind, &'a dyn Links),
}

fn link<T: Entity + Links>(field: &RefOrInline<T>) -> Link<'_> {
    match field {
        RefOrInline::Ref(name) => Link::Named(T::KIND, name),
        RefOrInline::Inline(value) => Link::Inline(T::KIND, &**value),
    }
}

/// Outgoing cross-entity fields, in document order
pub trait Links {
    fn links(&self) -> Vec<Link<'_>>;
}

impl Links for TextureData {
    fn links(&self) -> Vec<Link<'_>> {
        self.texture_fields().into_iter().map(link).collect()
    }
}

impl Links for MaterialData {
    fn links(&self) -> Vec<Link<'_>> {
        vec![link(self.reflectance_texture()), link(self.emittance_texture())]
    }
}

impl Links for GeometricData {
    fn links(&self) -> Vec<Link<'_>> {
        let mut links: Vec<Link<'_>> = self.geometric_fields().into_iter().map(link).collect();
        links.extend(self.material().map(link));
        links.extend(self.texture_field().map(link));
        links
    }
}

impl Links for CameraData {
    fn links(&self) -> Vec<Link<'_>> {
        Vec::new()
    }
}

impl Links for SceneData {
    fn links(&self) -> Vec<Link<'_>> {
        let mut links: Vec<Link<'_>> = self.geometrics.iter().map(link).collect();
        links.push(link(&self.camera));
        links
    }
}

/// The table entry stored under `name`, as a link source
pub fn entry<'a>(config: &'a RenderConfig, kind: EntityKind, name: &str) -> Option<&'a dyn Links> {
    match kind {
        EntityKind::Texture => config.textures.get(name).map(|e| e as &dyn Links),
        EntityKind::Material => config.materials.get(name).map(|e| e as &dyn Links),
        EntityKind::Geometric => config.geometrics.get(name).map(|e| e as &dyn Links),
        EntityKind::Camera => config.cameras.get(name).map(|e| e as &dyn Links),
        EntityKind::Scene => config.scenes.get(name).map(|e| e as &dyn Links),
    }
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
}

/// Distinct material names a geometric uses, following composites.
pub fn referenced_material_names(config: &RenderConfig, geometric: &GeometricData) -> Vec<String> {
    fn walk<'a>(
        config: &'a RenderConfig,
        geometric: &'a GeometricData,
        visited: &mut HashSet<&'a str>,
        names: &mut Vec<String>,
    ) {
        if let Some(name) = geometric.material().and_then(RefOrInline::name) {
            push_unique(names, name);
        }

        for child in geometric.geometric_fields() {
            match child {
                RefOrInline::Inline(inline) => walk(config, inline, visited, names),
                RefOrInline::Ref(name) => {
                    if !visited.insert(name.as_str()) {
                        continue;
                    }
                    if let Some(stored) = config.geometrics.get(name) {
                        walk(config, stored, visited, names);
                    }
                }
            }
        }
    }

    let mut names = Vec::new();
    walk(config, geometric, &mut HashSet::new(), &mut names);
    names
}

/// Distinct texture names a material uses, emittance first
pub fn referenced_texture_names(material: &MaterialData) -> Vec<String> {
    let mut names = Vec::new();
    for field in [material.emittance_texture(), material.reflectance_texture()] {
        if let Some(name) = field.name() {
            push_unique(&mut names, name);
        }
    }
    names
}

/// References whose target is missing from its table
pub fn dangling_references(config: &RenderConfig) -> Vec<(EntityKind, String)> {
    fn walk(config: &RenderConfig, source: &dyn Links, out: &mut Vec<(EntityKind, String)>) {
        for link in source.links() {
            match link {
                Link::Named(kind, name) => {
                    if !config.contains(kind, name) {
                        out.push((kind, name.to_string()));
                    }
                }
                Link::Inline(_, inline) => walk(config, inline, out),
            }
        }
    }

    let mut out = Vec::new();
    match &config.active_scene {
        RefOrInline::Ref(name) if !config.scenes.contains_key(name) => {
            out.push((EntityKind::Scene, name.clone()));
        }
        RefOrInline::Inline(scene) => walk(config, &**scene, &mut out),
        RefOrInline::Ref(_) => {}
    }
    for kind in EntityKind::ALL {
        for name in config.names(kind) {
            if let Some(source) = entry(config, kind, name) {
                walk(config, source, &mut out);
            }
        }
    }
    out
}

/// Remove every table entry unreachable from the scenes.
///
/// Roots are the active scene and every entry of the scene table.
/// Built-in entries are never removed. Missing references are ignored
/// while marking. Returns the removed entries in table order.
pub fn sweep_orphans(config: &mut RenderConfig) -> Vec<(EntityKind, String)> {
    let marked = mark_reachable(config);

    let mut removed = Vec::new();
    for kind in EntityKind::ALL {
        let orphans: Vec<String> = config
            .names(kind)
            .into_iter()
            .filter(|name| !builtin::is_builtin(name))
            .filter(|name| !marked.contains(&(kind, name.to_string())))
            .map(str::to_string)
            .collect();

        for name in orphans {
            config.remove(kind, &name);
            removed.push((kind, name));
        }
    }

    if !removed.is_empty() {
        log::info!("Swept {} orphaned entries from '{}'", removed.len(), config.name);
    }
    removed
}

fn mark_reachable(config: &RenderConfig) -> HashSet<(EntityKind, String)> {
    let mut marked: HashSet<(EntityKind, String)> = HashSet::new();
    let mut pending: Vec<&dyn Links> = Vec::new();

    match &config.active_scene {
        RefOrInline::Ref(name) => {
            if let Some(scene) = config.scenes.get(name) {
                marked.insert((EntityKind::Scene, name.clone()));
                pending.push(scene);
            }
        }
        RefOrInline::Inline(scene) => pending.push(&**scene),
    }
    for (name, scene) in &config.scenes {
        if marked.insert((EntityKind::Scene, name.clone())) {
            pending.push(scene);
        }
    }

    while let Some(source) = pending.pop() {
        for link in source.links() {
            match link {
                Link::Inline(_, inline) => pending.push(inline),
                Link::Named(kind, name) => {
                    let Some(target) = entry(config, kind, name) else {
                        continue;
                    };
                    if marked.insert((kind, name.to_string())) {
                        pending.push(target);
                    }
                }
            }
        }
    }

    marked
}

#[cfg(test)]
mod tests {
    use super::*;
    use luxide_schema::Template;

    fn cornell() -> RenderConfig {
        Template::CornellBox.build()
    }

    #[test]
    fn test_referenced_material_names_follow_composites() {
        let config = cornell();
        let rotated = &config.geometrics["Far Left Box"];
        assert_eq!(referenced_material_names(&config, rotated), vec!["White"]);

        let light = &config.geometrics["Ceiling Light"];
        assert_eq!(referenced_material_names(&config, light), vec!["White Light"]);
    }

    #[test]
    fn test_referenced_material_names_survive_cycles() {
        let mut config = cornell();
        config.geometrics.insert(
            "Loop".to_string(),
            GeometricData::List {
                use_bvh: None,
                geometrics: vec!["Loop".into(), "Floor".into()],
            },
        );
        let looped = config.geometrics["Loop"].clone();
        assert_eq!(referenced_material_names(&config, &looped), vec!["White"]);
    }

    #[test]
    fn test_referenced_texture_names() {
        let config = cornell();
        assert_eq!(
            referenced_texture_names(&config.materials["White Light"]),
            vec!["White Light", "Black"]
        );
        let same = MaterialData::lambertian("Black", "Black");
        assert_eq!(referenced_texture_names(&same), vec!["Black"]);
    }

    #[test]
    fn test_template_has_no_orphans() {
        let mut config = cornell();
        let before = config.entity_count();
        assert!(sweep_orphans(&mut config).is_empty());
        assert_eq!(config.entity_count(), before);
        assert!(dangling_references(&config).is_empty());
    }

    #[test]
    fn test_sweep_removes_unreachable_entries() {
        let mut config = cornell();
        config.scenes["Cornell Box"]
            .geometrics
            .retain(|g| g.name() != Some("Ceiling Light"));

        let removed = sweep_orphans(&mut config);
        assert_eq!(
            removed,
            vec![
                (EntityKind::Texture, "White Light".to_string()),
                (EntityKind::Material, "White Light".to_string()),
                (EntityKind::Geometric, "Ceiling Light".to_string()),
            ]
        );
        assert!(config.textures.contains_key(builtin::WHITE));
        assert!(config.textures.contains_key("Black"));
    }

    #[test]
    fn test_sweep_terminates_on_cycles() {
        let mut config = cornell();
        config.geometrics.insert(
            "Loop".to_string(),
            GeometricData::List {
                use_bvh: None,
                geometrics: vec!["Loop".into()],
            },
        );
        config.scenes["Cornell Box"].geometrics.push("Loop".into());
        assert!(sweep_orphans(&mut config).is_empty());
        assert!(config.geometrics.contains_key("Loop"));
    }

    #[test]
    fn test_dangling_references() {
        let mut config = cornell();
        config.materials.shift_remove("Red");
        assert_eq!(
            dangling_references(&config),
            vec![(EntityKind::Material, "Red".to_string())]
        );
    }
}

//! Edit sessions
//!
//! An [`EditSession`] owns the live form document of one render config and
//! the settings that govern how edits are applied. Every path operation,
//! reconciliation and graph query goes through it.
//!
//! [`SharedSession`] puts a session behind an async mutex so that edits
//! arriving in quick succession are reconciled one after another, in the
//! order they were submitted.

use crate::error::EditResult;
use crate::mutate::{self, WriteOutcome};
use crate::oracle::ValidityOracle;
use crate::path::FormPath;
use crate::reconcile::{reconcile, ReconcileReport};
use crate::settings::SessionSettings;
use luxide_graph::{normalize, normalized, GraphError, NormalizeReport};
use luxide_schema::{default_value_for, EntityKind, RenderConfig, Template, Value};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// The live document of one editing form
#[derive(Debug, Clone)]
pub struct EditSession {
    document: Value,
    settings: SessionSettings,
}

impl EditSession {
    /// Start a session on a typed config. The config is normalized first.
    pub fn from_config(config: RenderConfig, settings: SessionSettings) -> EditResult<Self> {
        let mut config = if settings.include_builtins {
            config.with_builtins()
        } else {
            config
        };

        let report = normalize(&mut config);
        log::info!(
            "Opened '{}' ({} entities, {} extracted)",
            config.name,
            config.entity_count(),
            report.len()
        );

        Ok(Self {
            document: config.to_value()?,
            settings,
        })
    }

    /// Start a session on a JSON document
    pub fn from_json(text: &str, settings: SessionSettings) -> EditResult<Self> {
        Self::from_config(RenderConfig::from_json(text)?, settings)
    }

    /// Start a session on a starter template
    pub fn from_template(template: Template, settings: SessionSettings) -> EditResult<Self> {
        Self::from_config(template.build(), settings)
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Typed view of the live document
    pub fn config(&self) -> EditResult<RenderConfig> {
        Ok(RenderConfig::from_value(&self.document)?)
    }

    /// Extract any inline entities in the live document into their tables
    pub fn normalize(&mut self) -> EditResult<NormalizeReport> {
        let mut config = self.config()?;
        let report = normalize(&mut config);
        if !report.is_empty() {
            self.document = config.to_value()?;
        }
        Ok(report)
    }

    pub fn read(&self, path: &str) -> EditResult<&Value> {
        let path = FormPath::parse(path)?;
        Ok(mutate::read(&self.document, &path)?)
    }

    /// Write a field. An object written under the normalize setting is
    /// extracted into its table straight away.
    pub fn write(&mut self, path: &str, value: impl Into<Value>) -> EditResult<()> {
        let path = FormPath::parse(path)?;
        let value = value.into();
        let is_record = value.is_record();
        mutate::write(&mut self.document, &path, value)?;

        if is_record && self.settings.normalize_after_reconcile {
            if let Err(e) = self.normalize() {
                log::warn!("Document left unnormalized after writing '{}': {}", path, e);
            }
        }
        Ok(())
    }

    /// Write or clear a field. Clearing a tagged entry's `type` deletes it.
    pub fn write_or_delete(&mut self, path: &str, value: Option<Value>) -> EditResult<WriteOutcome> {
        let path = FormPath::parse(path)?;
        let outcome = mutate::write_or_delete(&mut self.document, &path, value)?;

        if matches!(outcome, WriteOutcome::Deleted { .. }) && self.settings.sweep_orphans_on_delete {
            if let Err(e) = self.sweep_orphans() {
                log::warn!("Skipped orphan sweep after delete: {}", e);
            }
        }
        Ok(outcome)
    }

    /// Replace a table entry with the default entity of another type
    pub fn change_type(&mut self, kind: EntityKind, name: &str, tag: &str) -> EditResult<()> {
        let value = default_value_for(kind, tag)?;
        let path = FormPath::parse(kind.table_name())?.child(name);
        mutate::write(&mut self.document, &path, value)?;
        log::debug!("Changed {} '{}' to {}", kind, name, tag);
        Ok(())
    }

    /// Copy every leaf of `candidate` the oracle accepts into the document
    pub async fn reconcile(
        &mut self,
        candidate: &Value,
        oracle: &dyn ValidityOracle,
    ) -> ReconcileReport {
        let report = reconcile(candidate, &mut self.document, oracle).await;

        if self.settings.normalize_after_reconcile && !report.committed.is_empty() {
            if let Err(e) = self.normalize() {
                log::warn!("Document left unnormalized after reconcile: {}", e);
            }
        }
        report
    }

    /// Remove entries no scene can reach
    pub fn sweep_orphans(&mut self) -> EditResult<Vec<(EntityKind, String)>> {
        let mut config = self.config()?;
        let removed = luxide_graph::sweep_orphans(&mut config);
        if !removed.is_empty() {
            self.document = config.to_value()?;
        }
        Ok(removed)
    }

    /// Materials used by a stored geometric
    pub fn referenced_material_names(&self, geometric: &str) -> EditResult<Vec<String>> {
        let config = self.config()?;
        let entity = config
            .geometrics
            .get(geometric)
            .ok_or_else(|| GraphError::not_found(EntityKind::Geometric, geometric))?;
        Ok(luxide_graph::referenced_material_names(&config, entity))
    }

    /// Textures used by a stored material
    pub fn referenced_texture_names(&self, material: &str) -> EditResult<Vec<String>> {
        let config = self.config()?;
        let entity = config
            .materials
            .get(material)
            .ok_or_else(|| GraphError::not_found(EntityKind::Material, material))?;
        Ok(luxide_graph::referenced_texture_names(entity))
    }

    /// Normalized JSON request body for a render job
    pub fn to_wire_json(&self) -> EditResult<String> {
        let (config, _) = normalized(&self.config()?);
        Ok(serde_json::to_string(&config)?)
    }
}

/// An edit session shared between tasks.
///
/// Reconciliations queue on the inner mutex and run in arrival order.
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<EditSession>>,
}

impl SharedSession {
    pub fn new(session: EditSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Exclusive access to the session
    pub async fn lock(&self) -> MutexGuard<'_, EditSession> {
        self.inner.lock().await
    }

    /// Queue a reconciliation behind any already in flight
    pub async fn reconcile(&self, candidate: Value, oracle: &dyn ValidityOracle) -> ReconcileReport {
        let mut session = self.inner.lock().await;
        session.reconcile(&candidate, oracle).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EditError, PathError};
    use crate::oracle::FnOracle;

    fn cornell() -> EditSession {
        EditSession::from_template(Template::CornellBox, SessionSettings::default()).unwrap()
    }

    #[test]
    fn test_session_opens_normalized_with_builtins() {
        let session = cornell();
        let config = session.config().unwrap();
        assert!(luxide_graph::is_normalized(&config));
        assert!(config.geometrics.contains_key("__unit_box"));
        assert_eq!(session.read("active_scene").unwrap(), &Value::from("Cornell Box"));
    }

    #[test]
    fn test_builtins_can_be_disabled() {
        let settings = SessionSettings {
            include_builtins: false,
            ..SessionSettings::default()
        };
        let text = Template::Empty.build().to_json_pretty().unwrap();
        let session = EditSession::from_json(&text, settings).unwrap();
        assert!(session.config().unwrap().textures.contains_key("__white"));

        let mut bare = RenderConfig::from_json(&text).unwrap();
        bare.textures.clear();
        bare.materials.clear();
        bare.geometrics.clear();
        let session = EditSession::from_config(bare, session.settings().clone()).unwrap();
        assert!(session.config().unwrap().textures.is_empty());
    }

    #[test]
    fn test_read_and_write() {
        let mut session = cornell();
        session.write("parameters.max_bounces", 12).unwrap();
        assert_eq!(session.read("parameters.max_bounces").unwrap(), &Value::from(12));
        assert_eq!(session.config().unwrap().parameters.max_bounces, 12);

        let err = session.read("materials.Chrome.type").unwrap_err();
        assert!(matches!(err, EditError::Path(PathError::NotFound { .. })));
    }

    #[test]
    fn test_delete_with_sweep() {
        let settings = SessionSettings {
            sweep_orphans_on_delete: true,
            ..SessionSettings::default()
        };
        let mut session = EditSession::from_template(Template::CornellBox, settings).unwrap();
        session
            .write_or_delete("scenes.Cornell Box.geometrics", Some(Value::Array(Vec::new())))
            .unwrap();

        let outcome = session.write_or_delete("textures.Red.type", None).unwrap();
        assert!(matches!(outcome, WriteOutcome::Deleted { .. }));

        let config = session.config().unwrap();
        assert!(config.geometrics.keys().all(|name| name.starts_with("__")));
        assert!(config.materials.keys().all(|name| name.starts_with("__")));
        assert!(config.cameras.contains_key("Camera 1"));
    }

    #[test]
    fn test_change_type() {
        let mut session = cornell();
        session.change_type(EntityKind::Material, "Red", "specular").unwrap();
        assert_eq!(session.read("materials.Red.type").unwrap(), &Value::from("specular"));
        assert_eq!(session.read("materials.Red.roughness").unwrap(), &Value::from(1.0));

        let err = session.change_type(EntityKind::Material, "Red", "metal").unwrap_err();
        assert!(matches!(err, EditError::Schema(_)));
    }

    #[test]
    fn test_reference_queries() {
        let session = cornell();
        assert_eq!(
            session.referenced_material_names("Far Left Box").unwrap(),
            vec!["White".to_string()]
        );
        assert_eq!(
            session.referenced_texture_names("White Light").unwrap(),
            vec!["White Light".to_string(), "Black".to_string()]
        );
        let err = session.referenced_texture_names("Chrome").unwrap_err();
        assert!(matches!(err, EditError::Graph(ref e) if e.is_not_found()));
    }

    #[test]
    fn test_wire_json_is_normalized() {
        let mut session = cornell();
        session
            .write(
                "scenes.Cornell Box.geometrics[9]",
                Value::from_typed(&luxide_schema::builtin::unit_box()).unwrap(),
            )
            .unwrap();

        let wire = session.to_wire_json().unwrap();
        let config = RenderConfig::from_json(&wire).unwrap();
        assert!(luxide_graph::is_normalized(&config));
        assert_eq!(
            config.scenes["Cornell Box"].geometrics[9].name(),
            Some("Box 1")
        );
    }

    #[test]
    fn test_writing_an_inline_entity_stores_a_reference() {
        let mut session = cornell();
        let sphere = luxide_schema::GeometricData::Sphere {
            center: [5.0, 1.0, -5.0],
            radius: 1.0,
            material: "White".into(),
        };
        session
            .write("scenes.Cornell Box.geometrics[9]", Value::from_typed(&sphere).unwrap())
            .unwrap();

        assert_eq!(
            session.read("scenes.Cornell Box.geometrics[9]").unwrap(),
            &Value::from("Sphere 1")
        );
        assert_eq!(session.read("geometrics.Sphere 1.radius").unwrap(), &Value::from(1.0));
        assert!(luxide_graph::is_normalized(&session.config().unwrap()));

        let mut raw = EditSession::from_template(
            Template::CornellBox,
            SessionSettings {
                normalize_after_reconcile: false,
                ..SessionSettings::default()
            },
        )
        .unwrap();
        raw.write("scenes.Cornell Box.geometrics[9]", Value::from_typed(&sphere).unwrap())
            .unwrap();
        assert!(raw.read("scenes.Cornell Box.geometrics[9]").unwrap().is_record());
    }

    #[tokio::test]
    async fn test_reconcile_normalizes_afterwards() {
        let mut session = cornell();
        let mut candidate = session.document().clone();
        let sphere = luxide_schema::GeometricData::Sphere {
            center: [5.0, 1.0, -5.0],
            radius: 1.0,
            material: "White".into(),
        };
        candidate
            .get_mut("scenes")
            .and_then(|s| s.get_mut("Cornell Box"))
            .and_then(|s| s.get_mut("geometrics"))
            .and_then(Value::as_array_mut)
            .unwrap()
            .push(Value::from_typed(&sphere).unwrap());

        let report = session.reconcile(&candidate, &FnOracle(|_: &str| None)).await;

        assert!(report.is_clean());
        assert!(report
            .committed
            .contains(&"scenes.Cornell Box.geometrics".to_string()));
        assert_eq!(
            session.read("scenes.Cornell Box.geometrics[9]").unwrap(),
            &Value::from("Sphere 1")
        );
    }

    #[tokio::test]
    async fn test_shared_session_applies_edits_in_order() {
        let shared = SharedSession::new(cornell());
        let oracle = FnOracle(|_: &str| None);
        let first: Value = [("name", "First")].into_iter().collect();
        let second: Value = [("name", "Second")].into_iter().collect();

        let (a, b) = tokio::join!(
            shared.reconcile(first, &oracle),
            shared.reconcile(second, &oracle)
        );

        assert_eq!(a.committed, vec!["name".to_string()]);
        assert_eq!(b.committed, vec!["name".to_string()]);
        assert_eq!(shared.lock().await.read("name").unwrap(), &Value::from("Second"));
    }
}

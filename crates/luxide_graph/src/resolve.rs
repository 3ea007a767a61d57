//! Reference resolution
//!
//! Turns a reference-or-inline field into a concrete entity and reports
//! where it came from. [`resolve`] fails on unknown names;
//! [`resolve_or_default`] substitutes the per-kind fallback and logs a
//! warning instead.

use crate::error::{GraphError, GraphResult};
use luxide_schema::{Entity, EntityKind, RefOrInline, RenderConfig, Table, Value};
use std::borrow::Cow;

/// Provenance of a resolved entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Embedded in its parent
    Inline,
    /// Looked up in a table under this name
    Reference(String),
    /// Fallback substituted for a missing reference
    Default,
}

impl Source {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Reference(name) => Some(name),
            _ => None,
        }
    }
}

/// A resolved entity and its provenance
#[derive(Debug, Clone)]
pub struct Resolved<'a, T: Clone> {
    pub value: Cow<'a, T>,
    pub source: Source,
}

impl<'a, T: Clone> Resolved<'a, T> {
    pub fn is_default(&self) -> bool {
        self.source == Source::Default
    }

    pub fn into_owned(self) -> T {
        self.value.into_owned()
    }
}

/// Resolve a field against an explicit table
pub fn resolve_in<'a, T: Entity>(
    table: &'a Table<T>,
    field: &'a RefOrInline<T>,
) -> GraphResult<Resolved<'a, T>> {
    match field {
        RefOrInline::Inline(value) => Ok(Resolved {
            value: Cow::Borrowed(&**value),
            source: Source::Inline,
        }),
        RefOrInline::Ref(name) => table
            .get(name)
            .map(|value| Resolved {
                value: Cow::Borrowed(value),
                source: Source::Reference(name.clone()),
            })
            .ok_or_else(|| GraphError::not_found(T::KIND, name)),
    }
}

/// Resolve a field against the matching table of `config`
pub fn resolve<'a, T: Entity>(
    config: &'a RenderConfig,
    field: &'a RefOrInline<T>,
) -> GraphResult<Resolved<'a, T>> {
    resolve_in(T::table(config), field)
}

/// Resolve a field, substituting the per-kind fallback for missing names.
pub fn resolve_or_default<'a, T: Entity>(
    config: &'a RenderConfig,
    field: &'a RefOrInline<T>,
) -> Resolved<'a, T> {
    match resolve(config, field) {
        Ok(resolved) => resolved,
        Err(err) => {
            log::warn!("{}; using default {}", err, T::KIND);
            Resolved {
                value: Cow::Owned(T::fallback()),
                source: Source::Default,
            }
        }
    }
}

/// A raw value resolved from the dynamic document
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedValue<'a> {
    pub value: &'a Value,
    pub source: Source,
}

/// Resolve a raw name-or-inline value against a raw table.
///
/// `table` is the dynamic table object, absent when the document has no
/// table of that kind yet.
pub fn resolve_raw<'a>(
    table: Option<&'a Value>,
    raw: &'a Value,
    kind: EntityKind,
) -> GraphResult<ResolvedValue<'a>> {
    if kind.matches(raw) {
        return Ok(ResolvedValue {
            value: raw,
            source: Source::Inline,
        });
    }

    let name = raw.as_str().ok_or(GraphError::InvalidReference {
        kind,
        found: raw.type_name(),
    })?;

    table
        .and_then(|t| t.get(name))
        .map(|value| ResolvedValue {
            value,
            source: Source::Reference(name.to_string()),
        })
        .ok_or_else(|| GraphError::not_found(kind, name))
}

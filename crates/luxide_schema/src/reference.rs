//! Reference-or-inline fields
//!
//! A cross-entity field either names an entry in a top-level table or
//! embeds the entity directly. On the wire a name is a bare string and an
//! inline entity is its object form.

use crate::config::RenderConfig;
use crate::kind::EntityKind;
use crate::value::Value;
use indexmap::IndexMap;
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize, Serializer};

/// Name-keyed table of entities
pub type Table<T> = IndexMap<String, T>;

/// A typed entity that lives in one of the render config tables
pub trait Entity: Clone + std::fmt::Debug + Serialize + DeserializeOwned {
    /// Kind of the table this entity is stored in
    const KIND: EntityKind;

    /// Wire type tag, for tagged kinds
    fn type_tag(&self) -> Option<&'static str> {
        None
    }

    /// Base used when allocating a table name for this entity
    fn base_name(&self) -> String {
        Self::KIND.base_name(self.type_tag())
    }

    /// Value substituted when a reference cannot be resolved
    fn fallback() -> Self;

    /// The table holding entities of this kind
    fn table(config: &RenderConfig) -> &Table<Self>;

    /// Mutable access to the table holding entities of this kind
    fn table_mut(config: &mut RenderConfig) -> &mut Table<Self>;
}

/// A field holding either the name of a table entry or an inline entity
#[derive(Debug, Clone, PartialEq)]
pub enum RefOrInline<T> {
    /// Name of an entry in the matching table
    Ref(String),
    /// Entity embedded in its parent
    Inline(Box<T>),
}

impl<T> RefOrInline<T> {
    /// Create a reference
    pub fn named(name: impl Into<String>) -> Self {
        Self::Ref(name.into())
    }

    /// Create an inline value
    pub fn inline(value: T) -> Self {
        Self::Inline(Box::new(value))
    }

    /// The referenced name, if this is a reference
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Ref(name) => Some(name),
            Self::Inline(_) => None,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline(_))
    }

    /// The inline value, if any
    pub fn as_inline(&self) -> Option<&T> {
        match self {
            Self::Ref(_) => None,
            Self::Inline(value) => Some(value),
        }
    }

    /// Mutable access to the inline value, if any
    pub fn as_inline_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Ref(_) => None,
            Self::Inline(value) => Some(value),
        }
    }

    /// Replace an inline field with a reference, returning the value it held.
    ///
    /// A field that is already a reference keeps its name.
    pub fn replace_with_ref(&mut self, name: impl Into<String>) -> Option<T> {
        if !self.is_inline() {
            return None;
        }
        match std::mem::replace(self, Self::Ref(name.into())) {
            Self::Inline(value) => Some(*value),
            Self::Ref(_) => None,
        }
    }
}

impl<T> From<&str> for RefOrInline<T> {
    fn from(name: &str) -> Self {
        Self::Ref(name.to_string())
    }
}

impl<T> From<String> for RefOrInline<T> {
    fn from(name: String) -> Self {
        Self::Ref(name)
    }
}

impl<T: Serialize> Serialize for RefOrInline<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Ref(name) => serializer.serialize_str(name),
            Self::Inline(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: Entity> Deserialize<'de> for RefOrInline<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        match raw {
            Value::String(name) => Ok(Self::Ref(name)),
            ref value if T::KIND.matches(value) => value
                .to_typed::<T>()
                .map(Self::inline)
                .map_err(D::Error::custom),
            other => Err(D::Error::custom(format!(
                "expected a {kind} name or an inline {kind}, got {}",
                other.type_name(),
                kind = T::KIND,
            ))),
        }
    }
}

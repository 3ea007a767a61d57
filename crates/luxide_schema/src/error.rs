//! Schema errors

use crate::kind::EntityKind;
use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while decoding or inspecting render configs
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Failed to decode render config: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unknown {kind} type '{tag}'")]
    UnknownType { kind: EntityKind, tag: String },

    #[error("Unknown template '{0}'")]
    UnknownTemplate(String),
}

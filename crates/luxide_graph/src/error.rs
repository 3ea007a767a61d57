//! Graph errors

use luxide_schema::{EntityKind, SchemaError};
use thiserror::Error;

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised while resolving or rewriting references
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("{kind} '{name}' not found. Is it specified in the {table} table?", table = .kind.table_name())]
    NotFound { kind: EntityKind, name: String },

    #[error("Expected a {kind} name or an inline {kind}, got {found}")]
    InvalidReference { kind: EntityKind, found: &'static str },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl GraphError {
    pub fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Whether this error reports a missing table entry
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

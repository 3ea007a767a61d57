//! Edit errors

use luxide_graph::GraphError;
use luxide_schema::SchemaError;
use thiserror::Error;

/// Result type for path operations
pub type PathResult<T> = Result<T, PathError>;

/// Result type for session operations
pub type EditResult<T> = Result<T, EditError>;

/// Errors raised while addressing the form document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Nothing at '{path}'")]
    NotFound { path: String },
}

impl PathError {
    pub fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }
}

/// Errors raised by an edit session
#[derive(Debug, Error)]
pub enum EditError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors raised while loading session settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Toml(#[from] toml::de::Error),
}

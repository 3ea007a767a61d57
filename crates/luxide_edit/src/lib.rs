//! # Luxide Edit
//!
//! Form-side editing of render configs:
//! - Path-addressed reads and writes on the dynamic form document
//! - Validity-gated reconciliation of a candidate form into the live one
//! - Edit sessions owning the live document and its settings
//!
//! ## Architecture
//!
//! ```text
//! candidate form ──► reconcile ──► live document ──► normalize ──► wire JSON
//!                       │
//!                       ▼
//!               ValidityOracle::check(path)
//! ```

pub mod error;
pub mod mutate;
pub mod oracle;
pub mod path;
pub mod reconcile;
pub mod session;
pub mod settings;

pub use error::{EditError, EditResult, PathError, PathResult, SettingsError};
pub use mutate::{
    ensure_skeleton, read, set_leaf, write, write_or_delete, WriteOutcome, MAX_PADDING,
};
pub use oracle::{FieldRules, FieldSchema, FnOracle, RuleViolation, SchemaOracle, ValidityOracle};
pub use path::{FormPath, Segment};
pub use reconcile::{reconcile, ReconcileReport};
pub use session::{EditSession, SharedSession};
pub use settings::SessionSettings;

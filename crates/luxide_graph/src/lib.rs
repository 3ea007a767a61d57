//! # Luxide Graph
//!
//! Operations over the reference graph of a render config:
//! - Resolving reference-or-inline fields with provenance
//! - Allocating collision-free names for new table entries
//! - Normalizing documents so that every link is a name
//! - Querying references and reclaiming unreachable entries
//!
//! ## Architecture
//!
//! ```text
//! raw RenderConfig ──► normalize ──► normalized RenderConfig
//!                        │   ▲
//!                        ▼   │
//!                  next_unique_name
//!
//! RenderConfig + RefOrInline<T> ──► resolve ──► Resolved { value, source }
//! ```

pub mod error;
pub mod names;
pub mod normalize;
pub mod references;
pub mod resolve;

pub use error::{GraphError, GraphResult};
pub use names::next_unique_name;
pub use normalize::{is_normalized, normalize, normalized, Normalize, NormalizeReport};
pub use references::{
    dangling_references, referenced_material_names, referenced_texture_names, sweep_orphans,
    Link, Links,
};
pub use resolve::{resolve, resolve_in, resolve_or_default, resolve_raw, Resolved, ResolvedValue, Source};

//! Version-gated JSON persistence.
//!
//! Each state slice (tree, auth presets, variables) serializes to its own
//! small document carrying a version field; the global snapshot nests
//! those documents as opaque strings. A loader that sees a version it does
//! not recognize returns the empty default instead of guessing.

mod auth;
mod snapshot;
mod tree;
mod variables;

pub use auth::{load_auth, save_auth};
pub use snapshot::{load_snapshot, save_snapshot, Snapshot};
pub use tree::{load_tree, save_tree};
pub use variables::{load_variables, save_variables};

/// Version tag of the per-slice documents.
pub(crate) const STATE_VERSION: &str = "1.0";

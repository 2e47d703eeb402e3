//! Apiary Infrastructure - Persistence and import adapters
//!
//! Everything that talks JSON lives here: the version-gated persistence
//! documents for trees, auth presets, variables and the global snapshot,
//! plus the Postman and Insomnia normalizers. All loaders degrade rather
//! than fail: bad input shrinks to the empty default and the warnings list
//! says what was lost.

pub mod import;
pub mod persistence;
pub mod warning;

pub use import::{insomnia, postman, ImportOutcome};
pub use persistence::{
    load_auth, load_snapshot, load_tree, load_variables, save_auth, save_snapshot, save_tree,
    save_variables, Snapshot,
};
pub use warning::{ImportWarning, WarningSeverity, WarningStats};

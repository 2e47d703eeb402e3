//! Foreign-format normalizers.
//!
//! Each normalizer turns an exported document into detached [`Subtree`]
//! fragments plus a flat variable map, collecting warnings for whatever it
//! had to skip. Grafting the fragments into a live tree is the caller's
//! business.

pub mod insomnia;
pub mod postman;

use apiary_domain::{Subtree, VariableScope};

use crate::warning::ImportWarning;

/// What a normalizer extracted from one document.
#[derive(Debug, Default)]
pub struct ImportOutcome {
    /// Request tree fragments, in document order.
    pub roots: Vec<Subtree>,
    /// Variables found alongside or instead of requests.
    pub variables: VariableScope,
    /// Everything that was skipped or guessed at.
    pub warnings: Vec<ImportWarning>,
}

impl ImportOutcome {
    /// Total number of records across all fragments.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.roots.iter().map(Subtree::count).sum()
    }
}

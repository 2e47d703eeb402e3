//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or tree mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A node id does not refer to a live node of the tree.
    #[error("unknown tree node: {0}")]
    UnknownNode(usize),

    /// A structural move would make a node its own ancestor.
    #[error("cannot move a node into its own subtree")]
    CyclicMove,

    /// A row index is outside the current visible-row range.
    #[error("row index out of range: {0}")]
    RowOutOfRange(usize),

    /// The named authentication entry does not exist.
    #[error("unknown authentication entry: {0}")]
    UnknownAuthEntry(String),

    /// The environment id does not exist in the store.
    #[error("unknown environment: {0}")]
    UnknownEnvironment(i32),

    /// The reserved default environment cannot be removed.
    #[error("the default environment cannot be deleted")]
    DefaultEnvironmentReserved,
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

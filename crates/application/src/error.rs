//! Application error types

use apiary_domain::DomainError;
use thiserror::Error;

/// Errors raised while orchestrating domain operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// A domain rule was violated.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The request referenced an auth preset that does not exist.
    #[error("unknown auth preset: {0}")]
    UnknownAuthPreset(String),

    /// The in-flight request was cancelled before completion.
    #[error("request cancelled")]
    Cancelled,
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

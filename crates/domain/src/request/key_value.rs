//! Key-value rows for headers and query parameters.

use serde::{Deserialize, Serialize};

/// One header or query-parameter row.
///
/// Rows keep their insertion order; a disabled row stays in the record but
/// is skipped when the request is prepared for sending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    /// Row key (header name / parameter name).
    pub key: String,
    /// Row value.
    pub value: String,
    /// Whether the row participates in the outgoing request.
    pub enabled: bool,
}

impl KeyValuePair {
    /// Creates an enabled pair.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }

    /// Creates a pair with an explicit enabled flag.
    #[must_use]
    pub fn with_enabled(key: impl Into<String>, value: impl Into<String>, enabled: bool) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled,
        }
    }
}

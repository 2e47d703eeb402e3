//! Transport-level settings shared by every request.

use serde::{Deserialize, Serialize};

/// Flags applied to outgoing requests regardless of their definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportSettings {
    /// Verify TLS certificates when sending.
    pub validate_ssl: bool,
    /// Follow HTTP redirects automatically.
    pub allow_redirects: bool,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            validate_ssl: false,
            allow_redirects: true,
        }
    }
}

//! Named authentication presets.
//!
//! Requests reference a preset by name instead of embedding credentials;
//! the reserved [`NO_AUTH_KEY`] name means "send nothing".

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::variables::VariableScope;

/// Reserved preset name meaning no authentication. Entries may not use it.
pub const NO_AUTH_KEY: &str = "None";

/// The credential shape of a preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthScheme {
    /// HTTP Basic credentials.
    Basic {
        /// Account name.
        username: String,
        /// Account password.
        password: String,
    },
    /// Bearer token.
    Bearer {
        /// The raw token.
        token: String,
    },
}

/// One named preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthEntry {
    /// Preset name, unique within a store.
    pub name: String,
    /// Credentials.
    pub scheme: AuthScheme,
}

impl AuthEntry {
    /// The `Authorization` header value for this preset.
    ///
    /// Credential fields may contain `{{ variable }}` tokens; they are
    /// resolved against `scope` before encoding.
    #[must_use]
    pub fn authorization_header(&self, scope: &VariableScope) -> String {
        match &self.scheme {
            AuthScheme::Basic { username, password } => {
                let username = scope.resolve(username).resolved;
                let password = scope.resolve(password).resolved;
                let encoded = BASE64.encode(format!("{username}:{password}"));
                format!("Basic {encoded}")
            }
            AuthScheme::Bearer { token } => {
                format!("Bearer {}", scope.resolve(token).resolved)
            }
        }
    }
}

/// All presets, kept sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStore {
    entries: Vec<AuthEntry>,
}

impl AuthStore {
    /// An empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The entries in name order.
    #[must_use]
    pub fn entries(&self) -> &[AuthEntry] {
        &self.entries
    }

    /// Number of presets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no presets exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a preset by name. [`NO_AUTH_KEY`] never resolves.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AuthEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Inserts a preset, replacing credentials in place when a preset with
    /// the same name already exists. The [`NO_AUTH_KEY`] name is dropped
    /// silently, it can never become a real entry.
    pub fn upsert(&mut self, entry: AuthEntry) {
        if entry.name == NO_AUTH_KEY {
            return;
        }
        if let Some(existing) = self.entries.iter_mut().find(|e| e.name == entry.name) {
            existing.scheme = entry.scheme;
        } else {
            self.entries.push(entry);
            self.entries.sort_by(|a, b| a.name.cmp(&b.name));
        }
    }

    /// Removes a preset by name; returns whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.name != name);
        self.entries.len() != before
    }

    /// A clone of the store with every credential field resolved against
    /// `scope`.
    #[must_use]
    pub fn resolve_with(&self, scope: &VariableScope) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|entry| AuthEntry {
                name: entry.name.clone(),
                scheme: match &entry.scheme {
                    AuthScheme::Basic { username, password } => AuthScheme::Basic {
                        username: scope.resolve(username).resolved,
                        password: scope.resolve(password).resolved,
                    },
                    AuthScheme::Bearer { token } => AuthScheme::Bearer {
                        token: scope.resolve(token).resolved,
                    },
                },
            })
            .collect();
        Self { entries }
    }

    /// Names usable as a request's auth key, [`NO_AUTH_KEY`] first.
    #[must_use]
    pub fn key_choices(&self) -> Vec<String> {
        let mut keys = vec![NO_AUTH_KEY.to_string()];
        keys.extend(self.entries.iter().map(|entry| entry.name.clone()));
        keys
    }
}

//! Auth preset serialization.
//!
//! `{"version": "1.0", "data": [...]}`. The credential shape is implicit:
//! a `token` field makes an entry a bearer preset, otherwise username and
//! password make it basic. An entry with neither invalidates the whole
//! document, credentials are not worth guessing at.

use apiary_domain::{AuthEntry, AuthScheme, AuthStore};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::persistence::STATE_VERSION;
use crate::warning::ImportWarning;

#[derive(Debug, Serialize, Deserialize)]
struct AuthEntryDto {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// Serializes the preset store.
#[must_use]
pub fn save_auth(store: &AuthStore) -> String {
    let data: Vec<AuthEntryDto> = store.entries().iter().map(entry_to_dto).collect();
    let data = serde_json::to_value(data).unwrap_or(Value::Array(Vec::new()));
    json!({ "version": STATE_VERSION, "data": data }).to_string()
}

fn entry_to_dto(entry: &AuthEntry) -> AuthEntryDto {
    match &entry.scheme {
        AuthScheme::Basic { username, password } => AuthEntryDto {
            name: entry.name.clone(),
            username: Some(username.clone()),
            password: Some(password.clone()),
            token: None,
        },
        AuthScheme::Bearer { token } => AuthEntryDto {
            name: entry.name.clone(),
            username: None,
            password: None,
            token: Some(token.clone()),
        },
    }
}

/// Deserializes a preset document. A version mismatch returns an empty
/// store silently; any malformed entry returns an empty store with one
/// warning.
#[must_use]
pub fn load_auth(json: &str) -> (AuthStore, Vec<ImportWarning>) {
    let store = AuthStore::new();
    let mut warnings = Vec::new();

    let Ok(document) = serde_json::from_str::<Value>(json) else {
        warnings.push(ImportWarning::error("auth", "document is not valid JSON"));
        return (store, warnings);
    };
    if document.get("version").and_then(Value::as_str) != Some(STATE_VERSION) {
        return (store, warnings);
    }
    let Some(data) = document.get("data").and_then(Value::as_array) else {
        warnings.push(ImportWarning::warning("auth", "document has no data array"));
        return (store, warnings);
    };

    let mut loaded = AuthStore::new();
    for (index, value) in data.iter().enumerate() {
        let Some(entry) = parse_entry(value) else {
            warnings.push(ImportWarning::error(
                format!("auth/data[{index}]"),
                "entry has neither token nor username and password",
            ));
            return (store, warnings);
        };
        loaded.upsert(entry);
    }
    (loaded, warnings)
}

fn parse_entry(value: &Value) -> Option<AuthEntry> {
    let dto: AuthEntryDto = serde_json::from_value(value.clone()).ok()?;
    let scheme = if let Some(token) = dto.token {
        AuthScheme::Bearer { token }
    } else {
        match (dto.username, dto.password) {
            (Some(username), Some(password)) => AuthScheme::Basic { username, password },
            _ => return None,
        }
    };
    Some(AuthEntry {
        name: dto.name,
        scheme,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_store() -> AuthStore {
        let mut store = AuthStore::new();
        store.upsert(AuthEntry {
            name: "basic".to_string(),
            scheme: AuthScheme::Basic {
                username: "u".to_string(),
                password: "p".to_string(),
            },
        });
        store.upsert(AuthEntry {
            name: "bearer".to_string(),
            scheme: AuthScheme::Bearer {
                token: "t".to_string(),
            },
        });
        store
    }

    #[test]
    fn test_round_trip() {
        let store = sample_store();
        let (loaded, warnings) = load_auth(&save_auth(&store));
        assert!(warnings.is_empty());
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_token_takes_precedence() {
        let json = r#"{"version":"1.0","data":[{"name":"x","username":"u","password":"p","token":"t"}]}"#;
        let (loaded, _) = load_auth(json);
        assert_eq!(
            loaded.get("x").unwrap().scheme,
            AuthScheme::Bearer {
                token: "t".to_string()
            }
        );
    }

    #[test]
    fn test_incomplete_entry_invalidates_document() {
        let json = r#"{"version":"1.0","data":[
            {"name":"fine","token":"t"},
            {"name":"broken","username":"u"}
        ]}"#;
        let (loaded, warnings) = load_auth(json);
        assert!(loaded.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_unknown_version_loads_empty_silently() {
        let (loaded, warnings) = load_auth(r#"{"version":"9","data":[]}"#);
        assert!(loaded.is_empty());
        assert!(warnings.is_empty());
    }
}

//! Global workspace snapshot.
//!
//! The outer document carries transport settings, the selected environment
//! id and an `environmentState` payload that is itself serialized JSON,
//! one entry per environment with its auth / variables / tree documents
//! nested as opaque strings. Version 2 is current; the legacy version-1
//! shape kept the three state strings at the top level and implied a
//! single default environment.

use apiary_domain::{
    Environment, EnvironmentStore, TransportSettings, DEFAULT_ENVIRONMENT_ID, NO_AUTH_KEY,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::persistence::{load_auth, load_tree, load_variables, save_auth, save_tree, save_variables};
use crate::warning::ImportWarning;

/// Current snapshot version.
const SNAPSHOT_VERSION: i64 = 2;

/// Everything a workspace persists.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// All environments plus the selection.
    pub environments: EnvironmentStore,
    /// Transport flags.
    pub settings: TransportSettings,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvironmentDto {
    id: i32,
    #[serde(default)]
    name: String,
    #[serde(default)]
    base_url: String,
    #[serde(default = "default_auth_key")]
    default_auth_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    variables_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_state: Option<String>,
}

fn default_auth_key() -> String {
    NO_AUTH_KEY.to_string()
}

/// Serializes the snapshot in the current version.
#[must_use]
pub fn save_snapshot(snapshot: &Snapshot) -> String {
    let environments: Vec<EnvironmentDto> = snapshot
        .environments
        .iter()
        .map(|environment| EnvironmentDto {
            id: environment.id,
            name: environment.name.clone(),
            base_url: environment.base_url.clone(),
            default_auth_key: environment.default_auth_key.clone(),
            auth_state: Some(save_auth(&environment.auth)),
            variables_state: Some(save_variables(&environment.variables)),
            request_state: Some(save_tree(&environment.tree)),
        })
        .collect();
    let environment_state =
        json!({ "environments": environments }).to_string();

    json!({
        "version": SNAPSHOT_VERSION,
        "validateSSL": snapshot.settings.validate_ssl,
        "allowRedirects": snapshot.settings.allow_redirects,
        "selectedEnvironment": snapshot.environments.selected_id(),
        "environmentState": environment_state,
    })
    .to_string()
}

/// Deserializes a snapshot of any recognized version.
///
/// Version 1 (or a missing version field) hydrates the top-level state
/// strings into the implicit default environment. Unrecognized versions
/// load as the empty default snapshot.
#[must_use]
pub fn load_snapshot(json: &str) -> (Snapshot, Vec<ImportWarning>) {
    let mut warnings = Vec::new();
    let Ok(document) = serde_json::from_str::<Value>(json) else {
        warnings.push(ImportWarning::error(
            "snapshot",
            "document is not valid JSON",
        ));
        return (Snapshot::default(), warnings);
    };

    let settings = TransportSettings {
        validate_ssl: document
            .get("validateSSL")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        allow_redirects: document
            .get("allowRedirects")
            .and_then(Value::as_bool)
            .unwrap_or(true),
    };
    let mut snapshot = Snapshot {
        environments: EnvironmentStore::new(),
        settings,
    };

    match parse_version(&document) {
        Some(1) => {
            let environment = snapshot.environments.selected_mut();
            hydrate(
                environment,
                document.get("authState").and_then(Value::as_str),
                document.get("variablesState").and_then(Value::as_str),
                document.get("requestState").and_then(Value::as_str),
                &mut warnings,
            );
        }
        Some(SNAPSHOT_VERSION) => {
            load_environments(&document, &mut snapshot, &mut warnings);
            let selected = document
                .get("selectedEnvironment")
                .and_then(Value::as_i64)
                .and_then(|id| i32::try_from(id).ok())
                .unwrap_or(DEFAULT_ENVIRONMENT_ID);
            if snapshot.environments.select(selected).is_err() {
                warnings.push(ImportWarning::warning(
                    "snapshot",
                    format!("selected environment {selected} does not exist"),
                ));
            }
        }
        _ => return (Snapshot::default(), warnings),
    }
    (snapshot, warnings)
}

/// The version is written as a JSON number but older builds stored it as
/// a numeric string; a missing field means the legacy shape.
fn parse_version(document: &Value) -> Option<i64> {
    match document.get("version") {
        None => Some(1),
        Some(value) => value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok())),
    }
}

fn load_environments(document: &Value, snapshot: &mut Snapshot, warnings: &mut Vec<ImportWarning>) {
    let Some(state) = document.get("environmentState").and_then(Value::as_str) else {
        warnings.push(ImportWarning::warning(
            "snapshot",
            "snapshot has no environmentState",
        ));
        return;
    };
    let Ok(inner) = serde_json::from_str::<Value>(state) else {
        warnings.push(ImportWarning::error(
            "snapshot/environmentState",
            "payload is not valid JSON",
        ));
        return;
    };
    let Some(entries) = inner.get("environments").and_then(Value::as_array) else {
        warnings.push(ImportWarning::warning(
            "snapshot/environmentState",
            "payload has no environments array",
        ));
        return;
    };

    for (index, entry) in entries.iter().enumerate() {
        let dto: EnvironmentDto = match serde_json::from_value(entry.clone()) {
            Ok(dto) => dto,
            Err(err) => {
                warnings.push(ImportWarning::warning(
                    format!("snapshot/environments[{index}]"),
                    format!("malformed environment: {err}"),
                ));
                continue;
            }
        };
        let mut environment = Environment::new(dto.id, dto.name);
        environment.base_url = dto.base_url;
        environment.default_auth_key = dto.default_auth_key;
        hydrate(
            &mut environment,
            dto.auth_state.as_deref(),
            dto.variables_state.as_deref(),
            dto.request_state.as_deref(),
            warnings,
        );
        snapshot.environments.restore(environment);
    }
}

fn hydrate(
    environment: &mut Environment,
    auth_state: Option<&str>,
    variables_state: Option<&str>,
    request_state: Option<&str>,
    warnings: &mut Vec<ImportWarning>,
) {
    if let Some(state) = auth_state {
        let (auth, mut inner) = load_auth(state);
        environment.auth = auth;
        warnings.append(&mut inner);
    }
    if let Some(state) = variables_state {
        let (variables, mut inner) = load_variables(state);
        environment.variables = variables;
        warnings.append(&mut inner);
    }
    if let Some(state) = request_state {
        let (tree, mut inner) = load_tree(state);
        environment.tree = tree;
        warnings.append(&mut inner);
    }
}

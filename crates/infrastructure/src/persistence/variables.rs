//! Variable serialization.
//!
//! `{"version": "1.0", "variables": [{key, value}, ...]}`. Malformed rows
//! are skipped individually; one aggregate warning reports how many.

use apiary_domain::VariableScope;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::persistence::STATE_VERSION;
use crate::warning::ImportWarning;

#[derive(Debug, Deserialize)]
struct VariableDto {
    key: String,
    value: String,
}

/// Serializes the scope.
#[must_use]
pub fn save_variables(scope: &VariableScope) -> String {
    let variables: Vec<Value> = scope
        .iter()
        .map(|(key, value)| json!({ "key": key, "value": value }))
        .collect();
    json!({ "version": STATE_VERSION, "variables": variables }).to_string()
}

/// Deserializes a variables document. Version mismatches load empty
/// silently; skipped rows are counted into one warning.
#[must_use]
pub fn load_variables(json: &str) -> (VariableScope, Vec<ImportWarning>) {
    let mut scope = VariableScope::new();
    let mut warnings = Vec::new();

    let Ok(document) = serde_json::from_str::<Value>(json) else {
        warnings.push(ImportWarning::error(
            "variables",
            "document is not valid JSON",
        ));
        return (scope, warnings);
    };
    if document.get("version").and_then(Value::as_str) != Some(STATE_VERSION) {
        return (scope, warnings);
    }
    let Some(rows) = document.get("variables").and_then(Value::as_array) else {
        warnings.push(ImportWarning::warning(
            "variables",
            "document has no variables array",
        ));
        return (scope, warnings);
    };

    let mut skipped = 0_usize;
    for row in rows {
        match serde_json::from_value::<VariableDto>(row.clone()) {
            Ok(row) => scope.set(row.key, row.value),
            Err(_) => skipped += 1,
        }
    }
    if skipped > 0 {
        warnings.push(ImportWarning::warning(
            "variables",
            format!("skipped {skipped} malformed entries"),
        ));
    }
    (scope, warnings)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip() {
        let mut scope = VariableScope::new();
        scope.set("baseUrl", "https://api.x.com");
        scope.set("token", "abc");
        let (loaded, warnings) = load_variables(&save_variables(&scope));
        assert!(warnings.is_empty());
        assert_eq!(loaded, scope);
    }

    #[test]
    fn test_malformed_rows_are_skipped_with_one_warning() {
        let json = r#"{"version":"1.0","variables":[
            {"key":"a","value":"1"},
            {"key":"b"},
            {"value":"3"},
            {"key":"d","value":"4"}
        ]}"#;
        let (loaded, warnings) = load_variables(json);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("a"), Some("1"));
        assert_eq!(loaded.get("d"), Some("4"));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_unknown_version_loads_empty_silently() {
        let (loaded, warnings) = load_variables(r#"{"version":"0.9","variables":[]}"#);
        assert!(loaded.is_empty());
        assert!(warnings.is_empty());
    }
}

//! Request tree serialization.
//!
//! `{"version": "1.0", "nodes": [...]}` where a folder is
//! `{name, expanded, children}` (the two structural fields only when it
//! has children) and a leaf carries the full request definition. Loading
//! is forgiving: a version mismatch yields an empty tree, a malformed node
//! keeps everything parsed before it and abandons the rest with a single
//! warning.

use std::str::FromStr;

use apiary_domain::{
    BodyKind, HttpMethod, KeyValuePair, RecordKind, RequestDetails, RequestRecord, RequestTree,
    Subtree, NodeId, NO_AUTH_KEY,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::persistence::STATE_VERSION;
use crate::warning::ImportWarning;

#[derive(Debug, Deserialize)]
struct PairDto {
    #[serde(default)]
    key: String,
    #[serde(default)]
    value: String,
    #[serde(default = "default_true")]
    enabled: bool,
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct LeafDto {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    method: String,
    url: String,
    #[serde(rename = "authKey", default = "default_auth_key")]
    auth_key: String,
    #[serde(default)]
    params: Vec<PairDto>,
    #[serde(default)]
    headers: Vec<PairDto>,
    #[serde(default)]
    body: String,
    #[serde(rename = "bodyType", default)]
    body_kind: BodyKind,
}

fn default_auth_key() -> String {
    NO_AUTH_KEY.to_string()
}

#[derive(Debug, Deserialize)]
struct FolderDto {
    #[serde(default)]
    name: String,
    #[serde(default)]
    expanded: bool,
    #[serde(default)]
    children: Vec<Value>,
}

/// Serializes the whole tree. Never fails: the document is built from
/// plain JSON values.
#[must_use]
pub fn save_tree(tree: &RequestTree) -> String {
    let nodes: Vec<Value> = tree
        .children(tree.root())
        .iter()
        .map(|&child| node_to_value(tree, child))
        .collect();
    json!({ "version": STATE_VERSION, "nodes": nodes }).to_string()
}

fn node_to_value(tree: &RequestTree, id: NodeId) -> Value {
    let Ok(record) = tree.record(id) else {
        return Value::Null;
    };
    match record.kind() {
        RecordKind::Request(details) => {
            let params: Vec<Value> = details
                .params
                .iter()
                .filter(|pair| !pair.key.is_empty())
                .map(pair_to_value)
                .collect();
            let headers: Vec<Value> = details
                .headers
                .iter()
                .filter(|pair| !pair.key.trim().is_empty())
                .map(pair_to_value)
                .collect();
            json!({
                "name": record.name(),
                "type": details.method.as_str(),
                "url": details.url,
                "authKey": details.auth_key,
                "params": params,
                "headers": headers,
                "body": details.body,
                "bodyType": details.body_kind.as_str(),
            })
        }
        RecordKind::Folder => {
            // unnamed prefix folders persist their derived label so the
            // grouping survives a reload
            let mut folder = json!({ "name": record.display_label() });
            let children = tree.children(id);
            if !children.is_empty() {
                folder["expanded"] = Value::Bool(tree.is_expanded(id));
                folder["children"] = Value::Array(
                    children
                        .iter()
                        .map(|&child| node_to_value(tree, child))
                        .collect(),
                );
            }
            folder
        }
    }
}

fn pair_to_value(pair: &KeyValuePair) -> Value {
    json!({ "key": pair.key, "value": pair.value, "enabled": pair.enabled })
}

/// Deserializes a tree document.
///
/// Returns the tree together with any warnings; both a missing `nodes`
/// array and the first malformed node produce exactly one warning. An
/// unrecognized version returns an empty tree with no warning at all.
#[must_use]
pub fn load_tree(json: &str) -> (RequestTree, Vec<ImportWarning>) {
    let mut tree = RequestTree::new();
    let mut warnings = Vec::new();

    let Ok(document) = serde_json::from_str::<Value>(json) else {
        warnings.push(ImportWarning::error("tree", "document is not valid JSON"));
        return (tree, warnings);
    };
    if document.get("version").and_then(Value::as_str) != Some(STATE_VERSION) {
        return (tree, warnings);
    }
    let Some(nodes) = document.get("nodes").and_then(Value::as_array) else {
        warnings.push(ImportWarning::warning("tree", "document has no nodes array"));
        return (tree, warnings);
    };

    let mut aborted = false;
    let roots = parse_nodes(nodes, "nodes", &mut warnings, &mut aborted);
    let root_id = tree.root();
    for root in roots {
        let _ = tree.graft(root_id, root);
    }
    (tree, warnings)
}

fn parse_nodes(
    values: &[Value],
    path: &str,
    warnings: &mut Vec<ImportWarning>,
    aborted: &mut bool,
) -> Vec<Subtree> {
    let mut parsed = Vec::new();
    for (index, value) in values.iter().enumerate() {
        if *aborted {
            break;
        }
        let path = format!("{path}[{index}]");
        match parse_node(value, &path, warnings, aborted) {
            Some(node) => parsed.push(node),
            None => {
                *aborted = true;
                break;
            }
        }
    }
    parsed
}

fn parse_node(
    value: &Value,
    path: &str,
    warnings: &mut Vec<ImportWarning>,
    aborted: &mut bool,
) -> Option<Subtree> {
    if value.get("url").is_some() {
        let leaf: LeafDto = match serde_json::from_value(value.clone()) {
            Ok(leaf) => leaf,
            Err(err) => {
                warnings.push(ImportWarning::error(path, format!("malformed request: {err}")));
                return None;
            }
        };
        let method = match HttpMethod::from_str(&leaf.method) {
            Ok(method) => method,
            Err(err) => {
                warnings.push(ImportWarning::error(path, err.to_string()));
                return None;
            }
        };
        let details = RequestDetails {
            url: leaf.url,
            method,
            auth_key: leaf.auth_key,
            headers: leaf.headers.into_iter().map(pair_from_dto).collect(),
            params: leaf.params.into_iter().map(pair_from_dto).collect(),
            body: leaf.body,
            body_kind: leaf.body_kind,
        };
        return Some(Subtree::leaf(RequestRecord::request(leaf.name, details)));
    }

    let folder: FolderDto = match serde_json::from_value(value.clone()) {
        Ok(folder) => folder,
        Err(err) => {
            warnings.push(ImportWarning::error(path, format!("malformed folder: {err}")));
            return None;
        }
    };
    let children = parse_nodes(&folder.children, path, warnings, aborted);
    let mut subtree = Subtree::folder(RequestRecord::folder(folder.name), children);
    subtree.expanded = folder.expanded;
    Some(subtree)
}

fn pair_from_dto(dto: PairDto) -> KeyValuePair {
    KeyValuePair::with_enabled(dto.key, dto.value, dto.enabled)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_tree() -> RequestTree {
        let mut tree = RequestTree::new();
        let folder = tree
            .add_child(tree.root(), RequestRecord::folder("api.x.com"))
            .unwrap();
        let mut record = RequestRecord::default_request("users");
        record.set_url("https://api.x.com/users");
        tree.add_child(folder, record).unwrap();
        tree
    }

    #[test]
    fn test_round_trip_preserves_structure() {
        let tree = sample_tree();
        let (loaded, warnings) = load_tree(&save_tree(&tree));
        assert!(warnings.is_empty());

        let roots = loaded.children(loaded.root());
        assert_eq!(roots.len(), 1);
        let folder = loaded.record(roots[0]).unwrap();
        assert!(folder.is_folder());
        assert_eq!(folder.display_label(), "api.x.com");
        let leaf = loaded.record(loaded.children(roots[0])[0]).unwrap();
        assert_eq!(leaf.name(), "users");
        assert_eq!(leaf.details().unwrap().url, "https://api.x.com/users");
    }

    #[test]
    fn test_unknown_version_loads_empty_silently() {
        let (tree, warnings) = load_tree(r#"{"version":"2.0","nodes":[{"name":"x"}]}"#);
        assert!(tree.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_nodes_warns_once() {
        let (tree, warnings) = load_tree(r#"{"version":"1.0"}"#);
        assert!(tree.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_malformed_node_keeps_earlier_nodes() {
        let json = r#"{
            "version": "1.0",
            "nodes": [
                {"name": "ok", "type": "GET", "url": "https://api.x.com/a"},
                {"name": "bad", "type": "TELEPORT", "url": "https://api.x.com/b"},
                {"name": "never", "type": "GET", "url": "https://api.x.com/c"}
            ]
        }"#;
        let (tree, warnings) = load_tree(json);
        assert_eq!(warnings.len(), 1);
        assert_eq!(tree.children(tree.root()).len(), 1);
        let kept = tree.record(tree.children(tree.root())[0]).unwrap();
        assert_eq!(kept.name(), "ok");
    }

    #[test]
    fn test_save_filters_blank_keys() {
        let mut tree = RequestTree::new();
        let mut record = RequestRecord::default_request("r");
        record.set_url("https://api.x.com/r");
        if let Some(details) = record.details_mut() {
            details.params = vec![
                KeyValuePair::new("", "dropped"),
                KeyValuePair::new("kept", "1"),
            ];
            details.headers = vec![KeyValuePair::new("   ", "dropped")];
        }
        tree.add_child(tree.root(), record).unwrap();

        let saved = save_tree(&tree);
        let doc: Value = serde_json::from_str(&saved).unwrap();
        let leaf = &doc["nodes"][0];
        assert_eq!(leaf["params"].as_array().unwrap().len(), 1);
        assert_eq!(leaf["headers"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_childless_folder_omits_structure_fields() {
        let mut tree = RequestTree::new();
        tree.add_child(tree.root(), RequestRecord::folder("empty"))
            .unwrap();
        let doc: Value = serde_json::from_str(&save_tree(&tree)).unwrap();
        let folder = &doc["nodes"][0];
        assert_eq!(folder.get("expanded"), None);
        assert_eq!(folder.get("children"), None);
    }
}

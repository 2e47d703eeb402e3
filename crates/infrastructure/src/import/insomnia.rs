//! Insomnia import.
//!
//! An Insomnia export is one flat `resources` array whose hierarchy is
//! expressed through `parentId` cross-references, so normalization runs in
//! two passes: first convert every recognized resource keyed by its id,
//! then re-parent — a resource whose parent is absent from the map becomes
//! a root. Environment resources contribute variables instead of nodes,
//! and every `{{ _.key }}` token is rewritten to the plain `{{ key }}`
//! form for each imported variable.

use apiary_domain::{
    BodyKind, HttpMethod, KeyValuePair, RequestDetails, RequestRecord, Subtree, NO_AUTH_KEY,
};
use serde_json::{Map, Value};

use crate::import::ImportOutcome;
use crate::warning::ImportWarning;

enum ResourceKind {
    Request { name: String, details: RequestDetails },
    Folder { name: String },
}

struct Resource {
    id: String,
    parent_id: Option<String>,
    kind: ResourceKind,
}

/// Normalizes one Insomnia export document.
#[must_use]
pub fn normalize(json: &str) -> ImportOutcome {
    let mut outcome = ImportOutcome::default();
    let Ok(document) = serde_json::from_str::<Value>(json) else {
        outcome.warnings.push(ImportWarning::error(
            "insomnia",
            "document is not valid JSON",
        ));
        return outcome;
    };
    let Some(resources) = document.get("resources").and_then(Value::as_array) else {
        outcome.warnings.push(ImportWarning::error(
            "insomnia",
            "document has no resources array",
        ));
        return outcome;
    };

    // first pass: convert resources, collect variables
    let mut converted: Vec<Resource> = Vec::new();
    for entry in resources {
        let (Some(kind), Some(id)) = (
            entry.get("_type").and_then(Value::as_str),
            entry.get("_id").and_then(Value::as_str),
        ) else {
            continue;
        };
        if entry.get("parentId").is_none() {
            continue;
        }
        let parent_id = entry
            .get("parentId")
            .and_then(Value::as_str)
            .map(str::to_string);

        match kind {
            "request" => match parse_request(entry) {
                Some(kind) => converted.push(Resource {
                    id: id.to_string(),
                    parent_id,
                    kind,
                }),
                None => outcome.warnings.push(ImportWarning::error(
                    format!("insomnia/{id}"),
                    "could not convert a request resource",
                )),
            },
            "request_group" | "workspace" => match entry.get("name").and_then(Value::as_str) {
                Some(name) => converted.push(Resource {
                    id: id.to_string(),
                    parent_id,
                    kind: ResourceKind::Folder {
                        name: name.to_string(),
                    },
                }),
                None => outcome.warnings.push(ImportWarning::error(
                    format!("insomnia/{id}"),
                    "could not convert a folder resource",
                )),
            },
            "environment" => {
                if let Some(data) = entry.get("data").and_then(Value::as_object) {
                    flatten_data(data, "", &mut outcome.variables);
                }
            }
            _ => {}
        }
    }

    // rewrite environment tokens in every converted request
    let keys: Vec<String> = outcome.variables.iter().map(|(k, _)| k.to_string()).collect();
    for resource in &mut converted {
        if let ResourceKind::Request { details, .. } = &mut resource.kind {
            rewrite_tokens(details, &keys);
        }
    }

    // second pass: re-parent; orphans become roots
    for index in 0..converted.len() {
        let is_root = match &converted[index].parent_id {
            None => true,
            Some(parent) => !converted.iter().any(|r| &r.id == parent),
        };
        if is_root {
            outcome.roots.push(build_subtree(&converted, index));
        }
    }
    outcome
}

fn build_subtree(resources: &[Resource], index: usize) -> Subtree {
    let resource = &resources[index];
    match &resource.kind {
        ResourceKind::Request { name, details } => {
            Subtree::leaf(RequestRecord::request(name.clone(), details.clone()))
        }
        ResourceKind::Folder { name } => {
            let children: Vec<Subtree> = resources
                .iter()
                .enumerate()
                .filter(|(_, candidate)| {
                    candidate.parent_id.as_deref() == Some(resource.id.as_str())
                })
                .map(|(child_index, _)| build_subtree(resources, child_index))
                .collect();
            Subtree::folder(RequestRecord::folder(name.clone()), children)
        }
    }
}

fn parse_request(entry: &Value) -> Option<ResourceKind> {
    let name = entry.get("name").and_then(Value::as_str)?;
    let method = entry.get("method").and_then(Value::as_str)?;
    let url = entry.get("url").and_then(Value::as_str)?;

    // Insomnia knows more verbs than we do; anything unrecognized
    // degrades to GET
    let method = method.parse::<HttpMethod>().unwrap_or(HttpMethod::Get);

    let params = entry
        .get("parameters")
        .and_then(Value::as_array)
        .map(|entries| named_pairs(entries, false))
        .unwrap_or_default();
    let headers = entry
        .get("headers")
        .and_then(Value::as_array)
        .map(|entries| named_pairs(entries, true))
        .unwrap_or_default();

    let mut body = String::new();
    let mut body_kind = BodyKind::Json;
    if let Some(body_obj) = entry.get("body") {
        if let Some(text) = body_obj.get("text").and_then(Value::as_str) {
            body = text.to_string();
        }
        if let Some(mime) = body_obj.get("mimeType").and_then(Value::as_str) {
            body_kind = BodyKind::from_mime(mime);
        }
    }

    Some(ResourceKind::Request {
        name: name.to_string(),
        details: RequestDetails {
            url: url.to_string(),
            method,
            auth_key: NO_AUTH_KEY.to_string(),
            headers,
            params,
            body,
            body_kind,
        },
    })
}

/// Insomnia key-value rows use `name`/`value`; headers additionally drop
/// rows with blank names.
fn named_pairs(entries: &[Value], skip_blank_names: bool) -> Vec<KeyValuePair> {
    entries
        .iter()
        .filter_map(|entry| {
            let name = entry.get("name").and_then(Value::as_str)?;
            let value = entry.get("value").and_then(Value::as_str)?;
            if skip_blank_names && name.trim().is_empty() {
                return None;
            }
            Some(KeyValuePair::new(name, value))
        })
        .collect()
}

/// Flattens nested environment data into dot-joined variable keys.
fn flatten_data(data: &Map<String, Value>, prefix: &str, variables: &mut apiary_domain::VariableScope) {
    for (key, value) in data {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(nested) => flatten_data(nested, &full_key, variables),
            Value::String(text) => variables.set(full_key, text.clone()),
            Value::Bool(flag) => variables.set(full_key, flag.to_string()),
            Value::Number(number) => variables.set(full_key, number.to_string()),
            _ => {}
        }
    }
}

/// Rewrites `{{ _.key }}` references to the plain `{{ key }}` form.
fn rewrite_tokens(details: &mut RequestDetails, keys: &[String]) {
    for key in keys {
        let search = format!("{{{{ _.{key} }}}}");
        let replacement = format!("{{{{ {key} }}}}");
        details.url = details.url.replace(&search, &replacement);
        details.body = details.body.replace(&search, &replacement);
        for header in &mut details.headers {
            header.key = header.key.replace(&search, &replacement);
            header.value = header.value.replace(&search, &replacement);
        }
        for param in &mut details.params {
            param.key = param.key.replace(&search, &replacement);
            param.value = param.value.replace(&search, &replacement);
        }
    }
}

//! Postman import.
//!
//! A Postman export is either a collection (`item` array, nested folders
//! and requests) or an environment (`values` array of typed variables).
//! Items missing a required field are skipped with a warning; only the
//! absence of the top-level structure aborts the import.

use std::str::FromStr;

use apiary_domain::{
    BodyKind, HttpMethod, KeyValuePair, RequestDetails, RequestRecord, Subtree, NO_AUTH_KEY,
};
use serde_json::Value;

use crate::import::ImportOutcome;
use crate::warning::ImportWarning;

/// Normalizes one Postman export document.
#[must_use]
pub fn normalize(json: &str) -> ImportOutcome {
    let mut outcome = ImportOutcome::default();
    let Ok(document) = serde_json::from_str::<Value>(json) else {
        outcome
            .warnings
            .push(ImportWarning::error("postman", "document is not valid JSON"));
        return outcome;
    };
    if document.get("item").is_some() {
        normalize_collection(&document, &mut outcome);
    } else {
        normalize_environment(&document, &mut outcome);
    }
    outcome
}

fn normalize_collection(document: &Value, outcome: &mut ImportOutcome) {
    let Some(name) = document
        .get("info")
        .and_then(|info| info.get("name"))
        .and_then(Value::as_str)
    else {
        outcome.warnings.push(ImportWarning::error(
            "postman",
            "collection has no info.name",
        ));
        return;
    };
    let Some(items) = document.get("item").and_then(Value::as_array) else {
        outcome
            .warnings
            .push(ImportWarning::error("postman", "collection has no items"));
        return;
    };

    let children = parse_items(items, name, &mut outcome.warnings);
    outcome
        .roots
        .push(Subtree::folder(RequestRecord::folder(name), children));
}

fn parse_items(items: &[Value], path: &str, warnings: &mut Vec<ImportWarning>) -> Vec<Subtree> {
    items
        .iter()
        .filter_map(|item| parse_item(item, path, warnings))
        .collect()
}

fn parse_item(item: &Value, path: &str, warnings: &mut Vec<ImportWarning>) -> Option<Subtree> {
    if item.get("item").is_some() {
        parse_folder(item, path, warnings)
    } else if item.get("request").is_some() {
        parse_request(item, path, warnings)
    } else {
        warnings.push(ImportWarning::error(
            path,
            "item is neither a folder nor a request",
        ));
        None
    }
}

fn parse_folder(item: &Value, path: &str, warnings: &mut Vec<ImportWarning>) -> Option<Subtree> {
    let Some(name) = item.get("name").and_then(Value::as_str) else {
        warnings.push(ImportWarning::error(path, "folder has no name"));
        return None;
    };
    let path = format!("{path}/{name}");
    let Some(items) = item.get("item").and_then(Value::as_array) else {
        warnings.push(ImportWarning::error(&path, "folder item is not an array"));
        return None;
    };
    let children = parse_items(items, &path, warnings);
    Some(Subtree::folder(RequestRecord::folder(name), children))
}

fn parse_request(item: &Value, path: &str, warnings: &mut Vec<ImportWarning>) -> Option<Subtree> {
    let Some(name) = item.get("name").and_then(Value::as_str) else {
        warnings.push(ImportWarning::error(path, "request has no name"));
        return None;
    };
    let path = format!("{path}/{name}");
    let request = item.get("request")?;

    let Some(method) = request.get("method").and_then(Value::as_str) else {
        warnings.push(ImportWarning::error(&path, "request has no method"));
        return None;
    };
    let Ok(method) = HttpMethod::from_str(method) else {
        // not an error: Postman knows more verbs than we support
        warnings.push(ImportWarning::info(
            &path,
            format!("unsupported method {method}, request skipped"),
        ));
        return None;
    };

    let Some(raw_url) = raw_url(request.get("url")) else {
        warnings.push(ImportWarning::error(&path, "request has no url"));
        return None;
    };
    // the raw URL carries the query string; params arrive separately
    let url = raw_url.split('?').next().unwrap_or(&raw_url).to_string();

    let params = request
        .get("url")
        .and_then(|u| u.get("query"))
        .and_then(Value::as_array)
        .map(|entries| typed_pairs(entries))
        .unwrap_or_default();
    let headers = request
        .get("header")
        .and_then(Value::as_array)
        .map(|entries| typed_pairs(entries))
        .unwrap_or_default();

    let mut body = String::new();
    let mut body_kind = BodyKind::Plain;
    if let Some(body_obj) = request.get("body") {
        if body_obj.get("mode").and_then(Value::as_str) == Some("raw") {
            if let Some(raw) = body_obj.get("raw").and_then(Value::as_str) {
                body = raw.to_string();
            }
            if let Some(language) = body_obj
                .get("options")
                .and_then(|o| o.get("raw"))
                .and_then(|r| r.get("language"))
                .and_then(Value::as_str)
            {
                body_kind = BodyKind::from_mime(language);
            }
        }
    }

    let details = RequestDetails {
        url,
        method,
        auth_key: NO_AUTH_KEY.to_string(),
        headers,
        params,
        body,
        body_kind,
    };
    Some(Subtree::leaf(RequestRecord::request(name, details)))
}

/// Postman writes the URL as an object with a `raw` field; older exports
/// used a plain string.
fn raw_url(url: Option<&Value>) -> Option<String> {
    let url = url?;
    if let Some(raw) = url.as_str() {
        return Some(raw.to_string());
    }
    url.get("raw").and_then(Value::as_str).map(str::to_string)
}

/// Key-value entries tagged `"type": "text"`; anything else is ignored.
fn typed_pairs(entries: &[Value]) -> Vec<KeyValuePair> {
    entries
        .iter()
        .filter(|entry| entry.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|entry| {
            let key = entry.get("key").and_then(Value::as_str)?;
            let value = entry.get("value").and_then(Value::as_str)?;
            Some(KeyValuePair::new(key, value))
        })
        .collect()
}

fn normalize_environment(document: &Value, outcome: &mut ImportOutcome) {
    let Some(values) = document.get("values").and_then(Value::as_array) else {
        outcome.warnings.push(ImportWarning::error(
            "postman",
            "environment has no values array",
        ));
        return;
    };

    for (index, entry) in values.iter().enumerate() {
        let Some(kind) = entry.get("type").and_then(Value::as_str) else {
            continue;
        };
        if kind != "text" {
            outcome.warnings.push(ImportWarning::error(
                format!("postman/values[{index}]"),
                "unsupported variable type",
            ));
            continue;
        }
        match (
            entry.get("key").and_then(Value::as_str),
            entry.get("value").and_then(Value::as_str),
        ) {
            (Some(key), Some(value)) => outcome.variables.set(key, value),
            _ => outcome.warnings.push(ImportWarning::error(
                format!("postman/values[{index}]"),
                "variable has no key or value",
            )),
        }
    }
}

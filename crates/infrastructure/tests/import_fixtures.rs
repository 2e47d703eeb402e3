//! End-to-end import fixtures: normalize a realistic export document and
//! graft the result into a live tree.

use apiary_domain::{BodyKind, HttpMethod, RequestTree};
use apiary_infrastructure::{insomnia, postman, WarningSeverity};
use pretty_assertions::assert_eq;

const POSTMAN_COLLECTION: &str = r#"{
    "info": {
        "name": "New Collection",
        "schema": "https://schema.getpostman.com/json/collection/v2.1.0/collection.json"
    },
    "item": [
        {
            "name": "Example Env User",
            "request": {
                "method": "GET",
                "url": { "raw": "https://gorest.co.in/public/v2/{{ baseEnvUser }}" }
            }
        },
        {
            "name": "Example Header",
            "request": {
                "method": "GET",
                "url": { "raw": "https://gorest.co.in/public/v2/users" },
                "header": [
                    { "key": "Accept", "value": "application/json", "type": "text" },
                    { "key": "X-Trace", "value": "1", "type": "text" },
                    { "key": "Generated", "value": "x", "type": "generated" }
                ]
            }
        },
        {
            "name": "Example Params",
            "request": {
                "method": "GET",
                "url": {
                    "raw": "https://gorest.co.in/public/v2/users?page=2",
                    "query": [
                        { "key": "page", "value": "2", "type": "text" }
                    ]
                }
            }
        },
        {
            "name": "folder1",
            "item": [
                {
                    "name": "Example DELETE",
                    "request": {
                        "method": "DELETE",
                        "url": { "raw": "https://gorest.co.in/public/v2/users/1" }
                    }
                },
                {
                    "name": "Example GET",
                    "request": {
                        "method": "GET",
                        "url": { "raw": "https://gorest.co.in/public/v2/users/1" }
                    }
                },
                {
                    "name": "Example PATCH",
                    "request": {
                        "method": "PATCH",
                        "url": { "raw": "https://gorest.co.in/public/v2/users/1" }
                    }
                },
                {
                    "name": "Example POST",
                    "request": {
                        "method": "POST",
                        "url": { "raw": "https://gorest.co.in/public/v2/users" },
                        "body": { "mode": "raw", "raw": "Hello World!" }
                    }
                },
                {
                    "name": "Example PUT",
                    "request": {
                        "method": "PUT",
                        "url": { "raw": "https://gorest.co.in/public/v2/users/1" }
                    }
                },
                {
                    "name": "Example HEAD",
                    "request": {
                        "method": "HEAD",
                        "url": { "raw": "https://gorest.co.in/public/v2/users/1" }
                    }
                }
            ]
        }
    ]
}"#;

#[test]
fn postman_collection_produces_expected_counts() {
    let outcome = postman::normalize(POSTMAN_COLLECTION);

    assert_eq!(outcome.roots.len(), 1);
    let collection = &outcome.roots[0];
    assert_eq!(collection.record.name(), "New Collection");
    assert_eq!(collection.children.len(), 4);

    let env_user = &collection.children[0];
    assert_eq!(
        env_user.record.details().unwrap().url,
        "https://gorest.co.in/public/v2/{{ baseEnvUser }}"
    );

    let header = &collection.children[1];
    assert_eq!(header.record.details().unwrap().headers.len(), 2);

    let params = &collection.children[2];
    let details = params.record.details().unwrap();
    assert_eq!(details.url, "https://gorest.co.in/public/v2/users");
    assert_eq!(details.params.len(), 1);

    // the HEAD request was skipped, leaving the five supported methods
    let folder = &collection.children[3];
    assert_eq!(folder.children.len(), 5);
    let warnings: Vec<_> = outcome
        .warnings
        .iter()
        .filter(|w| w.severity == WarningSeverity::Info)
        .collect();
    assert_eq!(warnings.len(), 1);
}

#[test]
fn postman_methods_map_and_sort_after_graft() {
    let outcome = postman::normalize(POSTMAN_COLLECTION);
    let mut tree = RequestTree::new();
    tree.merge_roots(outcome.roots).unwrap();

    let collection = tree.children(tree.root())[0];
    let folder = *tree
        .children(collection)
        .iter()
        .find(|&&child| tree.record(child).unwrap().is_folder())
        .unwrap();

    let methods: Vec<HttpMethod> = tree
        .children(folder)
        .iter()
        .map(|&child| tree.record(child).unwrap().details().unwrap().method)
        .collect();
    assert_eq!(
        methods,
        vec![
            HttpMethod::Delete,
            HttpMethod::Get,
            HttpMethod::Patch,
            HttpMethod::Post,
            HttpMethod::Put,
        ]
    );

    let post = tree.children(folder)[3];
    let details = tree.record(post).unwrap().details().unwrap();
    assert_eq!(details.body, "Hello World!");
    assert_eq!(details.body_kind, BodyKind::Plain);
}

#[test]
fn postman_environment_document_yields_variables() {
    let json = r#"{
        "name": "Example Env",
        "values": [
            { "key": "baseEnvUser", "value": "users/42", "type": "text" },
            { "key": "secret", "value": "s", "type": "secret" }
        ]
    }"#;
    let outcome = postman::normalize(json);
    assert!(outcome.roots.is_empty());
    assert_eq!(outcome.variables.get("baseEnvUser"), Some("users/42"));
    assert_eq!(outcome.warnings.len(), 1);
}

const INSOMNIA_EXPORT: &str = r#"{
    "_type": "export",
    "resources": [
        {
            "_id": "wrk_1",
            "parentId": null,
            "_type": "workspace",
            "name": "My Workspace"
        },
        {
            "_id": "fld_1",
            "parentId": "wrk_1",
            "_type": "request_group",
            "name": "gorest"
        },
        {
            "_id": "req_1",
            "parentId": "fld_1",
            "_type": "request",
            "name": "List users",
            "method": "GET",
            "url": "{{ _.host }}/public/v2/users",
            "headers": [
                { "name": "Accept", "value": "application/json" },
                { "name": "", "value": "dropped" }
            ],
            "parameters": [
                { "name": "page", "value": "{{ _.page }}" }
            ]
        },
        {
            "_id": "req_2",
            "parentId": "fld_1",
            "_type": "request",
            "name": "Create user",
            "method": "POST",
            "url": "{{ _.host }}/public/v2/users",
            "body": { "mimeType": "application/json", "text": "{\"name\":\"x\"}" }
        },
        {
            "_id": "env_1",
            "parentId": "wrk_1",
            "_type": "environment",
            "name": "Base Environment",
            "data": {
                "host": "https://gorest.co.in",
                "page": 2
            }
        },
        {
            "_id": "jar_1",
            "parentId": "wrk_1",
            "_type": "cookie_jar",
            "name": "Default Jar"
        }
    ]
}"#;

#[test]
fn insomnia_export_reparents_and_rewrites() {
    let outcome = insomnia::normalize(INSOMNIA_EXPORT);
    assert!(outcome.warnings.is_empty());

    assert_eq!(outcome.variables.get("host"), Some("https://gorest.co.in"));
    assert_eq!(outcome.variables.get("page"), Some("2"));

    assert_eq!(outcome.roots.len(), 1);
    let workspace = &outcome.roots[0];
    assert_eq!(workspace.record.name(), "My Workspace");
    // the cookie jar is ignored; only the folder survives at this level
    assert_eq!(workspace.children.len(), 1);

    let folder = &workspace.children[0];
    assert_eq!(folder.children.len(), 2);

    let list = folder.children[0].record.details().unwrap();
    assert_eq!(list.url, "{{ host }}/public/v2/users");
    assert_eq!(list.headers.len(), 1);
    assert_eq!(list.params[0].value, "{{ page }}");

    let create = folder.children[1].record.details().unwrap();
    assert_eq!(create.method, HttpMethod::Post);
    assert_eq!(create.body_kind, BodyKind::Json);
}

#[test]
fn imported_collection_merges_into_existing_top_folder() {
    let mut tree = RequestTree::new();
    let first = postman::normalize(POSTMAN_COLLECTION);
    tree.merge_roots(first.roots).unwrap();
    let count_after_first = tree.len();

    // importing the same collection again pours into the existing folder
    let second = postman::normalize(POSTMAN_COLLECTION);
    tree.merge_roots(second.roots).unwrap();

    assert_eq!(tree.children(tree.root()).len(), 1);
    assert!(tree.len() > count_after_first);
}

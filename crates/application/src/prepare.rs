//! Request preparation.
//!
//! Turns a stored [`RequestDetails`] into the concrete thing a transport
//! can send: variables resolved everywhere, relative URLs joined onto the
//! environment base URL, enabled query parameters appended, the referenced
//! auth preset rendered into an `Authorization` header. Unknown variables
//! do not fail preparation; their names are aggregated so the caller can
//! warn before dispatching anyway.

use apiary_domain::{
    AuthStore, BodyKind, HttpMethod, RequestDetails, TransportSettings, VariableScope, NO_AUTH_KEY,
};

use crate::error::{ApplicationError, ApplicationResult};

/// A fully resolved request, ready for a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Final URL, query parameters included.
    pub url: String,
    /// Header name/value pairs, the auth header included when one applies.
    pub headers: Vec<(String, String)>,
    /// Resolved body text.
    pub body: String,
    /// Body content kind.
    pub body_kind: BodyKind,
    /// Transport flags to apply.
    pub settings: TransportSettings,
    /// Distinct variable names that could not be resolved, in first-seen
    /// order across URL, parameters, headers and body.
    pub unresolved: Vec<String>,
}

/// Prepares `details` for dispatch against the given scope and presets.
///
/// The auth preset is looked up by the request's own key; [`NO_AUTH_KEY`]
/// sends nothing. A key naming a preset that does not exist is an error,
/// the request would otherwise silently go out unauthenticated.
pub fn prepare(
    details: &RequestDetails,
    scope: &VariableScope,
    auths: &AuthStore,
    base_url: &str,
    settings: TransportSettings,
) -> ApplicationResult<PreparedRequest> {
    let mut unresolved: Vec<String> = Vec::new();
    let mut track = |missing: Vec<String>| {
        for name in missing {
            if !unresolved.contains(&name) {
                unresolved.push(name);
            }
        }
    };

    let url_resolution = scope.resolve(details.url.trim());
    track(url_resolution.unresolved);
    let mut url = join_base_url(base_url, &url_resolution.resolved);

    let mut first = !url.contains('?');
    for param in &details.params {
        if !param.enabled || param.key.trim().is_empty() {
            continue;
        }
        let key = scope.resolve(&param.key);
        let value = scope.resolve(&param.value);
        track(key.unresolved);
        track(value.unresolved);
        url.push(if first { '?' } else { '&' });
        url.push_str(&key.resolved);
        url.push('=');
        url.push_str(&value.resolved);
        first = false;
    }

    let mut headers: Vec<(String, String)> = Vec::new();
    for header in &details.headers {
        if !header.enabled || header.key.trim().is_empty() {
            continue;
        }
        let key = scope.resolve(&header.key);
        let value = scope.resolve(&header.value);
        track(key.unresolved);
        track(value.unresolved);
        headers.push((key.resolved, value.resolved));
    }

    if details.auth_key != NO_AUTH_KEY {
        let entry = auths
            .get(&details.auth_key)
            .ok_or_else(|| ApplicationError::UnknownAuthPreset(details.auth_key.clone()))?;
        headers.push(("Authorization".to_string(), entry.authorization_header(scope)));
    }

    let body = scope.resolve(&details.body);
    track(body.unresolved);

    Ok(PreparedRequest {
        method: details.method,
        url,
        headers,
        body: body.resolved,
        body_kind: details.body_kind,
        settings,
        unresolved,
    })
}

/// Joins a relative URL onto the environment base URL. URLs that already
/// carry a scheme pass through untouched, as do all URLs when no base is
/// configured.
fn join_base_url(base_url: &str, url: &str) -> String {
    let base = base_url.trim();
    if base.is_empty() || url.contains("://") {
        return url.to_string();
    }
    let base = base.trim_end_matches('/');
    let path = url.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

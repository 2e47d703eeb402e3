//! Request records: the payload of one tree node.
//!
//! A record is either a folder (a path-segment grouping with no method of
//! its own) or a request leaf. Both carry the path segments derived from
//! their URL (or label), which drive the prefix-merge insertion of
//! [`crate::tree::RequestTree`].

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::request::{BodyKind, HttpMethod, KeyValuePair};

/// Reserved auth key meaning "no authentication".
pub use crate::auth::NO_AUTH_KEY;

/// The request-specific fields of a leaf record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDetails {
    /// Raw URL, possibly containing `{{ variable }}` tokens.
    pub url: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Name of the referenced [`crate::auth::AuthEntry`], or [`NO_AUTH_KEY`].
    pub auth_key: String,
    /// Header rows, in editor order.
    pub headers: Vec<KeyValuePair>,
    /// Query-parameter rows, in editor order.
    pub params: Vec<KeyValuePair>,
    /// Request body text.
    pub body: String,
    /// Body content kind.
    pub body_kind: BodyKind,
}

/// Discriminates folders from request leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    /// A grouping node with no request of its own.
    Folder,
    /// A concrete HTTP request.
    Request(RequestDetails),
}

/// The value object describing one tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    name: String,
    kind: RecordKind,
    segments: Vec<String>,
    depth: usize,
}

impl RequestRecord {
    /// Creates a folder record. Its segments derive from the label so that
    /// slash-containing labels group like URLs do.
    #[must_use]
    pub fn folder(name: impl Into<String>) -> Self {
        let name = name.into();
        let segments = split_path(&name);
        Self {
            name,
            kind: RecordKind::Folder,
            segments,
            depth: 0,
        }
    }

    /// Creates an unnamed folder covering an explicit path prefix. Used
    /// when a shared prefix is spliced out into its own grouping node.
    #[must_use]
    pub const fn path_folder(segments: Vec<String>) -> Self {
        Self {
            name: String::new(),
            kind: RecordKind::Folder,
            segments,
            depth: 0,
        }
    }

    /// Creates a request leaf record.
    #[must_use]
    pub fn request(name: impl Into<String>, details: RequestDetails) -> Self {
        let segments = split_path(&details.url);
        Self {
            name: name.into(),
            kind: RecordKind::Request(details),
            segments,
            depth: 0,
        }
    }

    /// Creates the default empty GET request used by "new request" flows.
    #[must_use]
    pub fn default_request(name: impl Into<String>) -> Self {
        Self::request(
            name,
            RequestDetails {
                url: String::new(),
                method: HttpMethod::Get,
                auth_key: NO_AUTH_KEY.to_string(),
                headers: Vec::new(),
                params: Vec::new(),
                body: String::new(),
                body_kind: BodyKind::Json,
            },
        )
    }

    /// Returns the user label (may be empty for URL-derived nodes).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the user label. Folder segments follow the label.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        if self.is_folder() {
            self.segments = split_path(&self.name);
            self.clamp_depth();
        }
    }

    /// Returns the record kind.
    #[must_use]
    pub const fn kind(&self) -> &RecordKind {
        &self.kind
    }

    /// Returns true for folder records.
    #[must_use]
    pub const fn is_folder(&self) -> bool {
        matches!(self.kind, RecordKind::Folder)
    }

    /// Returns true for request leaves.
    #[must_use]
    pub const fn is_request(&self) -> bool {
        matches!(self.kind, RecordKind::Request(_))
    }

    /// Returns the request details of a leaf, or `None` for folders.
    #[must_use]
    pub const fn details(&self) -> Option<&RequestDetails> {
        match &self.kind {
            RecordKind::Request(details) => Some(details),
            RecordKind::Folder => None,
        }
    }

    /// Mutable access to the request details of a leaf.
    pub const fn details_mut(&mut self) -> Option<&mut RequestDetails> {
        match &mut self.kind {
            RecordKind::Request(details) => Some(details),
            RecordKind::Folder => None,
        }
    }

    /// Replaces the URL of a leaf and re-derives its path segments.
    /// No-op for folders.
    pub fn set_url(&mut self, url: impl Into<String>) {
        let url = url.into().trim().to_string();
        if let RecordKind::Request(details) = &mut self.kind {
            details.url = url;
            self.segments = split_path(&details.url);
            self.clamp_depth();
        }
    }

    /// Derived host + path segments (query stripped).
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segment at `depth`, if any.
    #[must_use]
    pub fn segment_at(&self, depth: usize) -> Option<&str> {
        self.segments.get(depth).map(String::as_str)
    }

    /// How many leading segments are already represented by ancestors.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Sets the consumed-prefix depth, clamped into the valid range.
    pub const fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
        self.clamp_depth();
    }

    /// One past the last segment index this record's path covers.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.segments.len()
    }

    /// The full derived path, all segments joined.
    #[must_use]
    pub fn full_path(&self) -> String {
        self.segments.join("/")
    }

    /// Label shown in the tree: the user name when present, otherwise the
    /// path remainder from `depth` onward.
    #[must_use]
    pub fn display_label(&self) -> String {
        if self.name.is_empty() {
            self.segments[self.depth.min(self.segments.len())..].join("/")
        } else {
            self.name.clone()
        }
    }

    /// Identity string used for merge deduplication: method-qualified for
    /// leaves, path-only for folders.
    #[must_use]
    pub fn identity(&self) -> String {
        match &self.kind {
            RecordKind::Request(details) => {
                format!("{}:{} - {}", details.method, self.full_path(), self.name)
            }
            RecordKind::Folder => format!("{} - {}", self.full_path(), self.name),
        }
    }

    /// In-place update from a newer record with the same identity: replaces
    /// every non-identity field of the request details.
    pub fn update_from(&mut self, newer: &Self) {
        if let (RecordKind::Request(details), RecordKind::Request(newer)) =
            (&mut self.kind, &newer.kind)
        {
            details.url = newer.url.clone();
            details.method = newer.method;
            details.auth_key = newer.auth_key.clone();
            details.headers = newer.headers.clone();
            details.params = newer.params.clone();
            details.body = newer.body.clone();
            details.body_kind = newer.body_kind;
            self.segments = split_path(&details.url);
            self.clamp_depth();
        }
    }

    const fn clamp_depth(&mut self) {
        let last = self.segments.len().saturating_sub(1);
        if self.depth > last {
            self.depth = last;
        }
    }
}

impl fmt::Display for RequestRecord {
    /// The sort/display string: folders show their label, leaves prefix
    /// their method.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RecordKind::Folder => write!(f, "{}", self.display_label()),
            RecordKind::Request(details) => {
                write!(f, "{}: {}", details.method, self.display_label())
            }
        }
    }
}

/// Splits a raw URL (or folder label) into host + path segments.
///
/// Anything after `?` is discarded. Proper URLs contribute their host and
/// non-empty path segments; strings that do not parse as absolute URLs fall
/// back to a naive `/` split with the first segment standing in for the
/// host.
#[must_use]
pub fn split_path(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    let raw = raw.split('?').next().unwrap_or(raw);
    if raw.is_empty() {
        return Vec::new();
    }

    if let Ok(parsed) = Url::parse(raw) {
        if let Some(host) = parsed.host_str() {
            let mut segments = vec![host.to_string()];
            if let Some(path) = parsed.path_segments() {
                segments.extend(path.filter(|s| !s.is_empty()).map(str::to_string));
            }
            return segments;
        }
    }

    raw.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

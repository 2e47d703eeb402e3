//! Request body kind

use serde::{Deserialize, Serialize};
use std::fmt;

/// The editor syntax / content kind of a request body.
///
/// Serialized names match the persisted tree format (`"JSON"`, `"XML"`,
/// `"Plain"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BodyKind {
    /// JSON body
    #[default]
    #[serde(rename = "JSON")]
    Json,
    /// XML body
    #[serde(rename = "XML")]
    Xml,
    /// Unstructured text body
    Plain,
}

impl BodyKind {
    /// Classifies a mime type (or editor language tag) by substring match.
    ///
    /// Anything that is neither JSON-ish nor XML-ish is treated as plain
    /// text, which is also the fallback for an absent mime type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.to_lowercase();
        if mime.contains("json") {
            Self::Json
        } else if mime.contains("xml") {
            Self::Xml
        } else {
            Self::Plain
        }
    }

    /// Returns the persisted name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Xml => "XML",
            Self::Plain => "Plain",
        }
    }
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_mime() {
        assert_eq!(BodyKind::from_mime("application/json"), BodyKind::Json);
        assert_eq!(BodyKind::from_mime("text/XML"), BodyKind::Xml);
        assert_eq!(BodyKind::from_mime("text/plain"), BodyKind::Plain);
        assert_eq!(BodyKind::from_mime(""), BodyKind::Plain);
    }
}

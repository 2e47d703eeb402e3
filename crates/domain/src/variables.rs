//! Variable substitution.
//!
//! Any editable text field may reference variables as `{{ name }}`. The
//! scanner walks the byte string once, alternating between looking for an
//! opening `{{` and the matching `}}`, collects the raw tokens and replaces
//! each one whose trimmed inner key is known. Unknown keys are reported so
//! the caller can warn before dispatch.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered key/value variable set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableScope {
    variables: BTreeMap<String, String>,
}

/// The outcome of substituting one string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The input with all known tokens replaced.
    pub resolved: String,
    /// Distinct unknown keys, in first-seen order.
    pub unresolved: Vec<String>,
}

impl Resolution {
    /// True when every referenced variable was known.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Human-readable summary of the unknown keys, if any.
    #[must_use]
    pub fn warning_message(&self) -> Option<String> {
        if self.unresolved.is_empty() {
            None
        } else {
            Some(format!(
                "unknown variables: {}",
                self.unresolved.join(", ")
            ))
        }
    }
}

impl VariableScope {
    /// An empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a scope from key/value pairs. Later duplicates win.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            variables: pairs.into_iter().collect(),
        }
    }

    /// Number of variables in the scope.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// True when the scope holds no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Inserts or replaces a variable.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Removes a variable.
    pub fn remove(&mut self, key: &str) {
        self.variables.remove(key);
    }

    /// Looks up a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// True if `key` is defined.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    /// Iterates the variables in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overlays `other` on top of this scope: keys in `other` win.
    #[must_use]
    pub fn merged_with(&self, other: &Self) -> Self {
        let mut variables = self.variables.clone();
        for (key, value) in &other.variables {
            variables.insert(key.clone(), value.clone());
        }
        Self { variables }
    }

    /// Replaces every `{{ key }}` token in `input` with its value.
    ///
    /// All occurrences of a known token are replaced; tokens whose key is
    /// not in the scope are left verbatim and reported once each.
    #[must_use]
    pub fn resolve(&self, input: &str) -> Resolution {
        let mut resolved = input.to_string();
        let mut unresolved: Vec<String> = Vec::new();
        for token in scan_tokens(input) {
            let key = token
                .trim_start_matches("{{")
                .trim_end_matches("}}")
                .trim();
            if let Some(value) = self.variables.get(key) {
                resolved = resolved.replace(&token, value);
            } else if !unresolved.iter().any(|k| k == key) {
                unresolved.push(key.to_string());
            }
        }
        Resolution {
            resolved,
            unresolved,
        }
    }
}

/// Collects the complete `{{ ... }}` tokens of `input`, in order.
///
/// A candidate opener only counts when at least five bytes remain, the
/// shortest well-formed token being `{{x}}`. Nesting is not interpreted;
/// the scanner simply alternates between opener and closer.
fn scan_tokens(input: &str) -> Vec<String> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut tokens = Vec::new();
    let mut open_at: Option<usize> = None;
    let mut index = 0;
    while index < len {
        match open_at {
            None => {
                if bytes[index] == b'{'
                    && index + 5 <= len
                    && bytes.get(index + 1) == Some(&b'{')
                {
                    open_at = Some(index);
                    index += 2;
                    continue;
                }
            }
            Some(start) => {
                if bytes[index] == b'}' && bytes.get(index + 1) == Some(&b'}') {
                    if let Some(token) = input.get(start..index + 2) {
                        tokens.push(token.to_string());
                    }
                    open_at = None;
                    index += 2;
                    continue;
                }
            }
        }
        index += 1;
    }
    tokens
}

//! Diagnostics collected while loading or importing.
//!
//! Persistence and import never abort wholesale on a bad record; they keep
//! what they can and report the rest as warnings for the caller to surface.

use serde::{Deserialize, Serialize};

/// Warning severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    /// Informational - an item was skipped without losing user data
    Info,
    /// Warning - something was dropped or guessed at
    Warning,
    /// Error - the operation partially failed but continued
    Error,
}

impl std::fmt::Display for WarningSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One load or import diagnostic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportWarning {
    /// Location of the problematic item (e.g., "collection/folder/request")
    pub path: String,
    /// Human-readable description of the issue
    pub message: String,
    /// Severity level
    pub severity: WarningSeverity,
}

impl ImportWarning {
    /// Create a new warning
    pub fn new(
        path: impl Into<String>,
        message: impl Into<String>,
        severity: WarningSeverity,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity,
        }
    }

    /// Create an info-level warning
    pub fn info(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, message, WarningSeverity::Info)
    }

    /// Create a warning-level warning
    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, message, WarningSeverity::Warning)
    }

    /// Create an error-level warning
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, message, WarningSeverity::Error)
    }

    /// Check if this is an error
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, WarningSeverity::Error)
    }
}

impl std::fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.path, self.message)
    }
}

/// Aggregate counts over a warning list
#[derive(Debug, Default)]
pub struct WarningStats {
    /// Count of informational warnings
    pub info_count: usize,
    /// Count of warning-level warnings
    pub warning_count: usize,
    /// Count of error-level warnings
    pub error_count: usize,
}

impl WarningStats {
    /// Calculate stats from a list of warnings
    #[must_use]
    pub fn from_warnings(warnings: &[ImportWarning]) -> Self {
        let mut stats = Self::default();
        for warning in warnings {
            match warning.severity {
                WarningSeverity::Info => stats.info_count += 1,
                WarningSeverity::Warning => stats.warning_count += 1,
                WarningSeverity::Error => stats.error_count += 1,
            }
        }
        stats
    }

    /// Total count of all warnings
    #[must_use]
    pub const fn total(&self) -> usize {
        self.info_count + self.warning_count + self.error_count
    }

    /// Check if there are any errors
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

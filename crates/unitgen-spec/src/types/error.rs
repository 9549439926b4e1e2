use serde::{Deserialize, Serialize};

use super::common::Severity;

// ── Error code constants ──

pub const E_PARSE_ERROR: &str = "E_PARSE_ERROR";
pub const E_SCHEMA_VIOLATION: &str = "E_SCHEMA_VIOLATION";
pub const E_VERSION_MISMATCH: &str = "E_VERSION_MISMATCH";
pub const E_MISSING_FIELD: &str = "E_MISSING_FIELD";
pub const E_EMPTY_FAMILY: &str = "E_EMPTY_FAMILY";
pub const E_MISSING_BASE_UNIT: &str = "E_MISSING_BASE_UNIT";
pub const E_AMBIGUOUS_BASE_UNIT: &str = "E_AMBIGUOUS_BASE_UNIT";
pub const E_MALFORMED_CONVERSION: &str = "E_MALFORMED_CONVERSION";
pub const E_UNUSED_PARAMETER: &str = "E_UNUSED_PARAMETER";
pub const E_IDENTIFIER_COLLISION: &str = "E_IDENTIFIER_COLLISION";
pub const E_MISSING_FALLBACK: &str = "E_MISSING_FALLBACK";
pub const E_DUPLICATE_ALIAS: &str = "E_DUPLICATE_ALIAS";
pub const E_UNSUPPORTED_NAME: &str = "E_UNSUPPORTED_NAME";
pub const E_UNPORTABLE_ALIAS: &str = "E_UNPORTABLE_ALIAS";

/// A single validation/parsing error entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Machine-readable stable error code
    pub code: String,
    /// Severity level
    pub severity: Severity,
    /// Human-readable error message
    pub message: String,
    /// File the error was found in
    pub file: String,
    /// JSONPath to the offending field
    pub path: String,
    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Aggregated validation report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether the schema is valid (no errors, warnings are ok)
    pub ok: bool,
    /// All collected errors, warnings, and info entries
    pub errors: Vec<ErrorEntry>,
}

impl ValidationReport {
    /// Create a successful (empty) report
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
        }
    }

    /// Create a report from a list of error entries
    pub fn from_errors(errors: Vec<ErrorEntry>) -> Self {
        let ok = !errors.iter().any(|e| e.severity == Severity::Error);
        Self { ok, errors }
    }

    /// Add an error entry and update the ok flag
    pub fn push(&mut self, entry: ErrorEntry) {
        if entry.severity == Severity::Error {
            self.ok = false;
        }
        self.errors.push(entry);
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: ValidationReport) {
        for entry in other.errors {
            self.push(entry);
        }
    }

    /// Count entries of a specific severity
    pub fn count(&self, severity: Severity) -> usize {
        self.errors.iter().filter(|e| e.severity == severity).count()
    }

    /// Check if any errors exist (not warnings/info)
    pub fn has_errors(&self) -> bool {
        !self.ok
    }

    /// Entries with the given code, in the order they were reported
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a ErrorEntry> + 'a {
        self.errors.iter().filter(move |e| e.code == code)
    }
}

impl ErrorEntry {
    /// Create a new error entry
    pub fn error(code: &str, message: impl Into<String>, file: &str, path: &str) -> Self {
        Self {
            code: code.to_string(),
            severity: Severity::Error,
            message: message.into(),
            file: file.to_string(),
            path: path.to_string(),
            suggestion: None,
        }
    }

    /// Create a warning entry
    pub fn warning(code: &str, message: impl Into<String>, file: &str, path: &str) -> Self {
        Self {
            code: code.to_string(),
            severity: Severity::Warning,
            message: message.into(),
            file: file.to_string(),
            path: path.to_string(),
            suggestion: None,
        }
    }

    /// Add a suggestion to this entry
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// JSONPath of a family within the definitions document.
pub fn family_path(family_index: usize) -> String {
    format!("$.definitions[{family_index}]")
}

/// JSONPath of a unit within the definitions document.
pub fn unit_path(family_index: usize, unit_index: usize) -> String {
    format!("$.definitions[{family_index}].units[{unit_index}]")
}

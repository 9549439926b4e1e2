use std::path::{Path, PathBuf};

use tracing::debug;

use crate::parser;
use crate::schema_def;
use crate::types::common::DocumentFormat;
use crate::types::config::{GeneratorConfig, CONFIG_FILE_NAME};
use crate::types::error::{ErrorEntry, E_PARSE_ERROR};
use crate::types::schema::SchemaSpec;

/// A parsed definitions document together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedSchema {
    /// Path the schema was read from
    pub path: PathBuf,
    /// File name used in diagnostics
    pub file: String,
    /// Serialized format of the document
    pub format: DocumentFormat,
    /// The parsed schema
    pub schema: SchemaSpec,
}

/// Read and parse a definitions document.
///
/// The raw document is first checked against the generated JSON Schema so
/// that every structural violation is reported at once; only a document that
/// passes is deserialized into the typed model.
#[allow(clippy::result_large_err)]
pub fn load_schema(path: &Path) -> Result<LoadedSchema, LoadError> {
    if !path.is_file() {
        return Err(LoadError::SchemaNotFound(path.to_string_lossy().into_owned()));
    }

    let format = parser::detect_format(path)
        .ok_or_else(|| LoadError::UnsupportedFormat(path.to_string_lossy().into_owned()))?;

    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    let content = std::fs::read_to_string(path)
        .map_err(|e| LoadError::IoError(path.to_string_lossy().into_owned(), e))?;

    let raw = parser::parse_document(&content, &file, format).map_err(LoadError::ParseError)?;

    let violations = schema_def::validate_against_schema(
        &raw,
        &schema_def::generate_definitions_schema(),
        &file,
    );
    if !violations.is_empty() {
        return Err(LoadError::SchemaViolation(violations));
    }

    let schema: SchemaSpec = serde_json::from_value(raw).map_err(|e| {
        LoadError::ParseError(ErrorEntry::error(
            E_PARSE_ERROR,
            format!("Failed to read definitions: {e}"),
            &file,
            "$",
        ))
    })?;

    debug!(
        file = %file,
        families = schema.definitions.len(),
        units = schema.unit_count(),
        "loaded unit schema"
    );

    Ok(LoadedSchema {
        path: path.to_path_buf(),
        file,
        format,
        schema,
    })
}

/// Load `unitgen.config.json` from the schema's directory, or defaults when absent.
#[allow(clippy::result_large_err)]
pub fn load_config(schema_path: &Path) -> Result<GeneratorConfig, LoadError> {
    let dir = schema_path.parent().unwrap_or_else(|| Path::new("."));
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.is_file() {
        debug!(path = %config_path.display(), "no generator config, using defaults");
        return Ok(GeneratorConfig::default());
    }

    let content = std::fs::read_to_string(&config_path)
        .map_err(|e| LoadError::IoError(config_path.to_string_lossy().into_owned(), e))?;
    parser::parse_config(&content, CONFIG_FILE_NAME).map_err(LoadError::ConfigParseError)
}

/// Errors that prevent a schema from being loaded at all
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Schema file not found: {0}")]
    SchemaNotFound(String),

    #[error("Unsupported schema format (expected .yaml, .yml or .json): {0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse schema: {}", .0.message)]
    ParseError(ErrorEntry),

    #[error("Schema document has {} structural violation(s)", .0.len())]
    SchemaViolation(Vec<ErrorEntry>),

    #[error("Failed to parse unitgen.config.json: {}", .0.message)]
    ConfigParseError(ErrorEntry),

    #[error("I/O error reading {0}: {1}")]
    IoError(String, std::io::Error),
}

impl LoadError {
    /// Structured entries describing this failure, for report printing.
    pub fn entries(&self) -> Vec<ErrorEntry> {
        match self {
            LoadError::ParseError(entry) | LoadError::ConfigParseError(entry) => {
                vec![entry.clone()]
            }
            LoadError::SchemaViolation(entries) => entries.clone(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::common::Language;
    use crate::types::error::E_SCHEMA_VIOLATION;
    use tempfile::TempDir;

    const MINIMAL_YAML: &str = r#"
version: "1.0.0"
definitions:
  - type: Number
    baseUnit: Number
    matches: ["number"]
    units:
      - name: Number
        fromBase: "x => x"
        toBase: "x => x"
        matches: ["*"]
"#;

    #[test]
    fn test_load_minimal_yaml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("units.yaml");
        std::fs::write(&path, MINIMAL_YAML).unwrap();

        let loaded = load_schema(&path).unwrap();
        assert_eq!(loaded.file, "units.yaml");
        assert_eq!(loaded.format, DocumentFormat::Yaml);
        assert_eq!(loaded.schema.definitions.len(), 1);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let err = load_schema(Path::new("/nonexistent/units.yaml")).unwrap_err();
        assert!(matches!(err, LoadError::SchemaNotFound(_)));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("units.toml");
        std::fs::write(&path, "version = 1").unwrap();
        let err = load_schema(&path).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_syntax_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("units.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_schema(&path).unwrap_err();
        assert!(matches!(err, LoadError::ParseError(_)));
        assert_eq!(err.entries().len(), 1);
    }

    #[test]
    fn test_load_reports_every_violation() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("units.json");
        std::fs::write(
            &path,
            r#"{ "version": "1.0.0", "definitions": [ { "type": "Length" }, { "baseUnit": "Meter" } ] }"#,
        )
        .unwrap();

        let err = load_schema(&path).unwrap_err();
        let entries = err.entries();
        assert!(entries.len() >= 2, "Expected several violations, got: {entries:?}");
        assert!(entries.iter().all(|e| e.code == E_SCHEMA_VIOLATION));
    }

    #[test]
    fn test_load_config_defaults_when_absent() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("units.yaml")).unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_load_config_beside_schema() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r#"{ "targets": ["go"], "goPackage": "measure" }"#,
        )
        .unwrap();
        let config = load_config(&tmp.path().join("units.yaml")).unwrap();
        assert_eq!(config.targets, vec![Language::Go]);
        assert_eq!(config.go_package, "measure");
    }

    #[test]
    fn test_load_invalid_config() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE_NAME), "not json").unwrap();
        let err = load_config(&tmp.path().join("units.yaml")).unwrap_err();
        assert!(matches!(err, LoadError::ConfigParseError(_)));
    }
}

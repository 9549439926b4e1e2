use std::path::Path;

use crate::types::common::DocumentFormat;
use crate::types::config::GeneratorConfig;
use crate::types::error::{ErrorEntry, E_PARSE_ERROR};

/// Parse a definitions document into an untyped JSON value, for schema checks
/// that should report every violation rather than the first serde error
#[allow(clippy::result_large_err)]
pub fn parse_document(
    content: &str,
    file_path: &str,
    format: DocumentFormat,
) -> Result<serde_json::Value, ErrorEntry> {
    match format {
        DocumentFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| yaml_error_to_entry(e, file_path))
        }
        DocumentFormat::Json => {
            serde_json::from_str(content).map_err(|e| json_error_to_entry(e, file_path))
        }
    }
}

/// Parse a unitgen.config.json file
#[allow(clippy::result_large_err)]
pub fn parse_config(content: &str, file_path: &str) -> Result<GeneratorConfig, ErrorEntry> {
    serde_json::from_str(content).map_err(|e| json_error_to_entry(e, file_path))
}

/// Detect the document format from the file extension
pub fn detect_format(file_path: &Path) -> Option<DocumentFormat> {
    let ext = file_path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "yaml" | "yml" => Some(DocumentFormat::Yaml),
        "json" => Some(DocumentFormat::Json),
        _ => None,
    }
}

/// Convert a serde_json error into a structured ErrorEntry
fn json_error_to_entry(err: serde_json::Error, file_path: &str) -> ErrorEntry {
    let path = format!("$.line:{}:col:{}", err.line(), err.column());

    ErrorEntry::error(
        E_PARSE_ERROR,
        format!("JSON parse error: {err}"),
        file_path,
        &path,
    )
    .with_suggestion("Check JSON syntax and field types")
}

/// Convert a serde_yaml error into a structured ErrorEntry
fn yaml_error_to_entry(err: serde_yaml::Error, file_path: &str) -> ErrorEntry {
    let path = match err.location() {
        Some(loc) => format!("$.line:{}:col:{}", loc.line(), loc.column()),
        None => "$".to_string(),
    };

    ErrorEntry::error(
        E_PARSE_ERROR,
        format!("YAML parse error: {err}"),
        file_path,
        &path,
    )
    .with_suggestion("Check YAML syntax and field names")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::schema::SchemaSpec;
    use pretty_assertions::assert_eq;

    const YAML: &str = r#"
version: "1.0.0"
definitions:
  - type: Number
    baseUnit: Number
    matches: ["number", "*"]
    units:
      - name: Number
        symbol: ""
        fromBase: "x => x"
        toBase: "x => x"
        matches: ["*"]
"#;

    #[test]
    fn test_parse_valid_yaml() {
        let raw = parse_document(YAML, "units.yaml", DocumentFormat::Yaml).unwrap();
        let schema: SchemaSpec = serde_json::from_value(raw).unwrap();
        assert_eq!(schema.version, "1.0.0");
        assert_eq!(schema.definitions.len(), 1);
        assert_eq!(schema.definitions[0].units[0].matches, vec!["*"]);
    }

    #[test]
    fn test_parse_valid_json() {
        let json = r#"{
            "version": "1.0.0",
            "definitions": [
                { "type": "Number", "baseUnit": "Number",
                  "units": [{ "name": "Number", "fromBase": "x => x", "toBase": "x => x" }] }
            ]
        }"#;
        let raw = parse_document(json, "units.json", DocumentFormat::Json).unwrap();
        assert_eq!(raw["definitions"][0]["type"], "Number");
    }

    #[test]
    fn test_parse_invalid_yaml_reports_location() {
        let err = parse_document("version: [", "units.yaml", DocumentFormat::Yaml).unwrap_err();
        assert_eq!(err.code, E_PARSE_ERROR);
        assert_eq!(err.file, "units.yaml");
        assert!(err.message.contains("YAML parse error"));
        assert!(err.path.starts_with('$'));
    }

    #[test]
    fn test_parse_invalid_json() {
        let err =
            parse_document("{ invalid json }", "units.json", DocumentFormat::Json).unwrap_err();
        assert_eq!(err.code, E_PARSE_ERROR);
        assert!(err.message.contains("JSON parse error"));
    }

    #[test]
    fn test_missing_required_field_fails_typed_read() {
        let yaml = r#"
version: "1.0.0"
definitions:
  - type: Length
    units: []
"#;
        let raw = parse_document(yaml, "units.yaml", DocumentFormat::Yaml).unwrap();
        let err = serde_json::from_value::<SchemaSpec>(raw).unwrap_err();
        assert!(err.to_string().contains("baseUnit"));
    }

    #[test]
    fn test_parse_config() {
        let config = parse_config(r#"{ "goPackage": "measure" }"#, "unitgen.config.json").unwrap();
        assert_eq!(config.go_package, "measure");
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(Path::new("units.yaml")), Some(DocumentFormat::Yaml));
        assert_eq!(detect_format(Path::new("units.YML")), Some(DocumentFormat::Yaml));
        assert_eq!(detect_format(Path::new("defs/units.json")), Some(DocumentFormat::Json));
        assert_eq!(detect_format(Path::new("units.toml")), None);
        assert_eq!(detect_format(Path::new("README")), None);
    }
}

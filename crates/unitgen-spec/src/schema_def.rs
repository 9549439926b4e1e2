use jsonschema::Validator;
use schemars::schema_for;

use crate::types::config::GeneratorConfig;
use crate::types::error::{ErrorEntry, E_SCHEMA_VIOLATION};
use crate::types::schema::SchemaSpec;

/// Generate a JSON Schema for the definitions document.
pub fn generate_definitions_schema() -> serde_json::Value {
    serde_json::to_value(schema_for!(SchemaSpec)).expect("schema serialization should not fail")
}

/// Generate a JSON Schema for `unitgen.config.json`.
pub fn generate_config_schema() -> serde_json::Value {
    serde_json::to_value(schema_for!(GeneratorConfig))
        .expect("schema serialization should not fail")
}

/// Validate a JSON value against a JSON Schema, returning errors in `ErrorEntry` format.
pub fn validate_against_schema(
    value: &serde_json::Value,
    schema: &serde_json::Value,
    file: &str,
) -> Vec<ErrorEntry> {
    let compiled = match Validator::new(schema) {
        Ok(v) => v,
        Err(e) => {
            return vec![ErrorEntry::error(
                E_SCHEMA_VIOLATION,
                format!("Invalid schema: {e}"),
                file,
                "$",
            )];
        }
    };

    compiled
        .iter_errors(value)
        .map(|err| {
            let instance_path = err.instance_path.as_str();
            let path = if instance_path.is_empty() {
                "$".to_string()
            } else {
                format!("${instance_path}")
            };
            ErrorEntry::error(E_SCHEMA_VIOLATION, err.to_string(), file, &path)
        })
        .collect()
}

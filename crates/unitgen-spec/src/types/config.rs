use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::Language;

/// File name of the optional generator configuration, looked up beside the schema.
pub const CONFIG_FILE_NAME: &str = "unitgen.config.json";

/// Generator configuration (unitgen.config.json)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Languages to render, in order
    #[serde(default = "default_targets")]
    pub targets: Vec<Language>,

    /// Package clause of the Go module
    #[serde(default = "default_go_package")]
    pub go_package: String,

    /// File name (without extension) of every generated module
    #[serde(default = "default_file_stem")]
    pub file_stem: String,

    /// Output directory, relative to the schema file
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            targets: default_targets(),
            go_package: default_go_package(),
            file_stem: default_file_stem(),
            out_dir: default_out_dir(),
        }
    }
}

fn default_targets() -> Vec<Language> {
    Language::ALL.to_vec()
}

fn default_go_package() -> String {
    "units".to_string()
}

fn default_file_stem() -> String {
    "units".to_string()
}

fn default_out_dir() -> String {
    "generated".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: GeneratorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.targets, vec![Language::Go, Language::Typescript]);
        assert_eq!(config.go_package, "units");
    }

    #[test]
    fn test_config_camel_case_fields() {
        let config: GeneratorConfig = serde_json::from_value(serde_json::json!({
            "targets": ["typescript"],
            "goPackage": "measure",
            "fileStem": "generated_units",
            "outDir": "./out"
        }))
        .unwrap();
        assert_eq!(config.targets, vec![Language::Typescript]);
        assert_eq!(config.go_package, "measure");
        assert_eq!(config.file_stem, "generated_units");
        assert_eq!(config.out_dir, "./out");
    }

    #[test]
    fn test_unknown_target_rejected() {
        let result: Result<GeneratorConfig, _> =
            serde_json::from_value(serde_json::json!({ "targets": ["cobol"] }));
        assert!(result.is_err());
    }
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Target programming languages a unit module can be rendered into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Go,
    Typescript,
}

impl Language {
    /// Every supported target, in the order modules are rendered.
    pub const ALL: [Language; 2] = [Language::Go, Language::Typescript];

    /// Parse a language name as written on the command line or in config.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "go" | "golang" => Some(Language::Go),
            "typescript" | "ts" => Some(Language::Typescript),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Go => write!(f, "go"),
            Language::Typescript => write!(f, "typescript"),
        }
    }
}

/// Error/warning severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Serialized form of a definitions document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_serialization() {
        assert_eq!(serde_json::to_value(Language::Go).unwrap(), "go");
        assert_eq!(
            serde_json::to_value(Language::Typescript).unwrap(),
            "typescript"
        );
    }

    #[test]
    fn test_language_from_name() {
        assert_eq!(Language::from_name("Go"), Some(Language::Go));
        assert_eq!(Language::from_name(" ts "), Some(Language::Typescript));
        assert_eq!(Language::from_name("cobol"), None);
    }

    #[test]
    fn test_severity_serialization() {
        assert_eq!(serde_json::to_value(Severity::Error).unwrap(), "error");
        assert_eq!(serde_json::to_value(Severity::Warning).unwrap(), "warning");
    }
}

use semver::Version;

use unitgen_spec::types::error::{ErrorEntry, ValidationReport, E_VERSION_MISMATCH};
use unitgen_spec::types::schema::SchemaSpec;

/// Major version of the definitions document this generator understands.
pub const SUPPORTED_MAJOR: u64 = 1;

/// Check that the schema version is semver and compatible with this generator.
pub fn check(schema: &SchemaSpec, file: &str, report: &mut ValidationReport) {
    let version_str = schema.version.trim();
    if version_str.is_empty() {
        // reported by required_fields
        return;
    }

    match Version::parse(version_str) {
        Ok(version) if version.major == SUPPORTED_MAJOR => {}
        Ok(_) => {
            report.push(
                ErrorEntry::error(
                    E_VERSION_MISMATCH,
                    format!(
                        "Unsupported schema version '{}'. Expected {}.x.y",
                        version_str, SUPPORTED_MAJOR
                    ),
                    file,
                    "$.version",
                )
                .with_suggestion("Update the document to the 1.x definitions format"),
            );
        }
        Err(_) => {
            report.push(
                ErrorEntry::error(
                    E_VERSION_MISMATCH,
                    format!("Invalid semver version: '{}'", version_str),
                    file,
                    "$.version",
                )
                .with_suggestion("Version must be valid semver (e.g., '1.0.0')"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::*;

    fn schema_with_version(version: &str) -> SchemaSpec {
        let mut schema = schema(vec![number_family()]);
        schema.version = version.to_string();
        schema
    }

    #[test]
    fn test_valid_version() {
        let mut report = ValidationReport::success();
        check(&schema_with_version("1.0.0"), "units.yaml", &mut report);
        assert!(!report.has_errors());
    }

    #[test]
    fn test_compatible_minor_version() {
        let mut report = ValidationReport::success();
        check(&schema_with_version("1.4.2"), "units.yaml", &mut report);
        assert!(!report.has_errors());
    }

    #[test]
    fn test_future_major_version() {
        let mut report = ValidationReport::success();
        check(&schema_with_version("2.0.0"), "units.yaml", &mut report);
        assert!(report.has_errors());
        assert_eq!(report.errors[0].code, E_VERSION_MISMATCH);
    }

    #[test]
    fn test_invalid_semver() {
        let mut report = ValidationReport::success();
        check(&schema_with_version("v1"), "units.yaml", &mut report);
        assert!(report.has_errors());
        assert_eq!(report.errors[0].path, "$.version");
    }

    #[test]
    fn test_empty_version_left_to_required_fields() {
        let mut report = ValidationReport::success();
        check(&schema_with_version(""), "units.yaml", &mut report);
        assert!(report.errors.is_empty());
    }
}

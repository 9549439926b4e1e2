use tracing::debug;

use unitgen_spec::loader::LoadedSchema;
use unitgen_spec::types::error::ValidationReport;
use unitgen_spec::types::schema::SchemaSpec;
use unitgen_spec::Severity;

use crate::rules;

/// Validate a loaded schema document.
/// Runs all validation rules and returns a consolidated report.
pub fn validate(loaded: &LoadedSchema) -> ValidationReport {
    validate_schema(&loaded.schema, &loaded.file)
}

/// Validate a schema that did not come from disk; `file` labels the entries.
pub fn validate_schema(schema: &SchemaSpec, file: &str) -> ValidationReport {
    let mut report = ValidationReport::success();

    rules::version_check::check(schema, file, &mut report);
    rules::required_fields::check(schema, file, &mut report);
    rules::base_unit::check(schema, file, &mut report);
    rules::conversion_syntax::check(schema, file, &mut report);
    rules::fallback::check(schema, file, &mut report);
    rules::identifiers::check(schema, file, &mut report);
    rules::duplicate_alias::check(schema, file, &mut report);
    rules::alias_portability::check(schema, file, &mut report);

    debug!(
        file,
        errors = report.count(Severity::Error),
        warnings = report.count(Severity::Warning),
        "validated schema"
    );
    report
}

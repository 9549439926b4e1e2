use unitgen_spec::types::error::{
    family_path, unit_path, ErrorEntry, ValidationReport, E_EMPTY_FAMILY, E_MISSING_FIELD,
};
use unitgen_spec::types::schema::SchemaSpec;

/// Check that names are present and every family has at least one unit.
pub fn check(schema: &SchemaSpec, file: &str, report: &mut ValidationReport) {
    if schema.version.trim().is_empty() {
        report.push(
            ErrorEntry::error(E_MISSING_FIELD, "Schema version is required", file, "$.version")
                .with_suggestion("Add a 'version' field (e.g., '1.0.0')"),
        );
    }

    for (fi, family) in schema.definitions.iter().enumerate() {
        if family.kind.trim().is_empty() {
            report.push(
                ErrorEntry::error(
                    E_MISSING_FIELD,
                    "Family type name is required",
                    file,
                    &format!("{}.type", family_path(fi)),
                )
                .with_suggestion("Give the family a 'type' (e.g., 'Pressure')"),
            );
        }

        if family.units.is_empty() {
            report.push(
                ErrorEntry::error(
                    E_EMPTY_FAMILY,
                    format!("Family '{}' has no units", family.kind),
                    file,
                    &format!("{}.units", family_path(fi)),
                )
                .with_suggestion("Add at least the base unit to 'units'"),
            );
        }

        for (ui, unit) in family.units.iter().enumerate() {
            if unit.name.trim().is_empty() {
                report.push(
                    ErrorEntry::error(
                        E_MISSING_FIELD,
                        format!("Unit #{ui} of '{}' has no name", family.kind),
                        file,
                        &format!("{}.name", unit_path(fi, ui)),
                    )
                    .with_suggestion("Give the unit a 'name' (e.g., 'Kilopascal')"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_complete_schema_passes() {
        let mut report = ValidationReport::success();
        check(&schema(vec![length_family(), number_family()]), "units.yaml", &mut report);
        assert!(report.ok);
    }

    #[test]
    fn test_empty_family_and_names() {
        let mut empty = family("Area", "SquareMeter", &[], vec![]);
        empty.kind = " ".to_string();
        let mut length = length_family();
        length.units[1].name = String::new();

        let mut report = ValidationReport::success();
        check(&schema(vec![empty, length]), "units.yaml", &mut report);

        let codes: Vec<&str> = report.errors.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec![E_MISSING_FIELD, E_EMPTY_FAMILY, E_MISSING_FIELD]);
        assert_eq!(report.errors[2].path, "$.definitions[1].units[1].name");
    }
}

use unitgen_spec::types::error::{
    family_path, ErrorEntry, ValidationReport, E_AMBIGUOUS_BASE_UNIT, E_MISSING_BASE_UNIT,
};
use unitgen_spec::types::schema::SchemaSpec;

/// Check that each family's `baseUnit` names exactly one of its units.
pub fn check(schema: &SchemaSpec, file: &str, report: &mut ValidationReport) {
    for (fi, family) in schema.definitions.iter().enumerate() {
        if family.units.is_empty() {
            continue;
        }
        let path = format!("{}.baseUnit", family_path(fi));

        match family.base_candidates() {
            0 => {
                let names: Vec<&str> = family.units.iter().map(|u| u.name.as_str()).collect();
                report.push(
                    ErrorEntry::error(
                        E_MISSING_BASE_UNIT,
                        format!(
                            "Base unit '{}' of '{}' is not one of its units",
                            family.base_unit, family.kind
                        ),
                        file,
                        &path,
                    )
                    .with_suggestion(format!(
                        "Set baseUnit to one of: {}",
                        names.join(", ")
                    )),
                );
            }
            1 => {}
            count => {
                report.push(
                    ErrorEntry::error(
                        E_AMBIGUOUS_BASE_UNIT,
                        format!(
                            "Base unit '{}' of '{}' matches {} units",
                            family.base_unit, family.kind, count
                        ),
                        file,
                        &path,
                    )
                    .with_suggestion("Unit names within a family must be unique"),
                );
            }
        }
    }
}

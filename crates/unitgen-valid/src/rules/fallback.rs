use unitgen_spec::types::error::{family_path, ErrorEntry, ValidationReport, E_MISSING_FALLBACK};
use unitgen_spec::types::schema::{SchemaSpec, FALLBACK_FAMILY, FALLBACK_UNIT};

/// Check that the Number family with a Number unit exists. Every generated
/// resolver returns it when nothing matches.
pub fn check(schema: &SchemaSpec, file: &str, report: &mut ValidationReport) {
    match schema.fallback_family() {
        None => report.push(
            ErrorEntry::error(
                E_MISSING_FALLBACK,
                format!("No '{FALLBACK_FAMILY}' family is defined"),
                file,
                "$.definitions",
            )
            .with_suggestion(format!(
                "Add a '{FALLBACK_FAMILY}' family with a '{FALLBACK_UNIT}' unit as the catch-all"
            )),
        ),
        Some((fi, family)) if family.unit(FALLBACK_UNIT).is_none() => report.push(
            ErrorEntry::error(
                E_MISSING_FALLBACK,
                format!("Family '{FALLBACK_FAMILY}' has no '{FALLBACK_UNIT}' unit"),
                file,
                &format!("{}.units", family_path(fi)),
            )
            .with_suggestion(format!("Add a unit named '{FALLBACK_UNIT}'")),
        ),
        Some(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fallback_present() {
        let mut report = ValidationReport::success();
        check(&schema(vec![length_family(), number_family()]), "units.yaml", &mut report);
        assert!(report.ok);
    }

    #[test]
    fn test_no_number_family() {
        let mut report = ValidationReport::success();
        check(&schema(vec![length_family()]), "units.yaml", &mut report);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, "$.definitions");
    }

    #[test]
    fn test_number_family_without_number_unit() {
        let mut number = number_family();
        number.units[0].name = "Scalar".to_string();
        let mut report = ValidationReport::success();
        check(&schema(vec![length_family(), number]), "units.yaml", &mut report);
        assert_eq!(report.errors[0].code, E_MISSING_FALLBACK);
        assert_eq!(report.errors[0].path, "$.definitions[1].units");
    }
}

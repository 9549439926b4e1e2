use std::collections::HashMap;

use unitgen_ir::ident;
use unitgen_spec::types::error::{
    family_path, unit_path, ErrorEntry, ValidationReport, E_DUPLICATE_ALIAS,
};
use unitgen_spec::types::schema::SchemaSpec;

/// Warn about aliases that can never win a lookup.
///
/// Family aliases are global and unit aliases are scoped to their family. In
/// both tables the first declaration wins, so a later duplicate is dead.
pub fn check(schema: &SchemaSpec, file: &str, report: &mut ValidationReport) {
    let mut family_aliases: HashMap<String, &str> = HashMap::new();

    for (fi, family) in schema.definitions.iter().enumerate() {
        for (ai, alias) in family.matches.iter().enumerate() {
            let key = ident::table_alias(alias);
            match family_aliases.get(&key) {
                Some(first) => report.push(
                    ErrorEntry::warning(
                        E_DUPLICATE_ALIAS,
                        format!(
                            "Family alias '{}' of '{}' is already claimed by '{}'",
                            alias, family.kind, first
                        ),
                        file,
                        &format!("{}.matches[{}]", family_path(fi), ai),
                    )
                    .with_suggestion("Remove the alias; the earlier family always wins"),
                ),
                None => {
                    family_aliases.insert(key, &family.kind);
                }
            }
        }

        let mut unit_aliases: HashMap<String, &str> = HashMap::new();
        for (ui, unit) in family.units.iter().enumerate() {
            for (ai, alias) in unit.matches.iter().enumerate() {
                let key = ident::table_alias(alias);
                match unit_aliases.get(&key) {
                    Some(first) => report.push(
                        ErrorEntry::warning(
                            E_DUPLICATE_ALIAS,
                            format!(
                                "Unit alias '{}' of '{}' is already claimed by '{}' in '{}'",
                                alias, unit.name, first, family.kind
                            ),
                            file,
                            &format!("{}.matches[{}]", unit_path(fi, ui), ai),
                        )
                        .with_suggestion("Remove the alias; the earlier unit always wins"),
                    ),
                    None => {
                        unit_aliases.insert(key, &unit.name);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::*;
    use pretty_assertions::assert_eq;
    use unitgen_spec::Severity;

    #[test]
    fn test_distinct_aliases() {
        let mut report = ValidationReport::success();
        check(&schema(vec![length_family(), number_family()]), "units.yaml", &mut report);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_family_alias_shadowed_after_normalization() {
        let mut number = number_family();
        number.matches.push("Dist ance".to_string());
        let mut report = ValidationReport::success();
        check(&schema(vec![length_family(), number]), "units.yaml", &mut report);

        assert!(report.ok);
        assert_eq!(report.errors.len(), 1);
        let entry = &report.errors[0];
        assert_eq!(entry.severity, Severity::Warning);
        assert_eq!(entry.path, "$.definitions[1].matches[1]");
        assert!(entry.message.contains("'Length'"));
    }

    #[test]
    fn test_unit_alias_scoped_to_family() {
        // "m" in two families is fine; twice in one family is not
        let mut other = length_family();
        other.kind = "Distance".to_string();
        other.matches = vec!["distance2".to_string()];
        other.units[1].matches.push("M".to_string());

        let mut report = ValidationReport::success();
        check(&schema(vec![length_family(), other]), "units.yaml", &mut report);

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, "$.definitions[1].units[1].matches[1]");
    }

    #[test]
    fn test_second_wildcard_is_dead() {
        let number = family(
            "Number",
            "Number",
            &[],
            vec![
                unit("Number", "x => x", "x => x", &["*"]),
                unit("Scalar", "x => x", "x => x", &["*"]),
            ],
        );
        let mut report = ValidationReport::success();
        check(&schema(vec![number]), "units.yaml", &mut report);
        assert_eq!(report.with_code(E_DUPLICATE_ALIAS).count(), 1);
    }

    #[test]
    fn test_spaced_wildcard_shadows_wildcard() {
        let mut number = number_family();
        number.matches = vec!["*".to_string(), " * ".to_string()];
        let mut report = ValidationReport::success();
        check(&schema(vec![number]), "units.yaml", &mut report);

        assert_eq!(report.with_code(E_DUPLICATE_ALIAS).count(), 1);
        assert_eq!(report.errors[0].path, "$.definitions[0].matches[1]");
    }
}

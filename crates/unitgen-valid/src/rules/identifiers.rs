use std::collections::HashMap;

use unitgen_ir::ident;
use unitgen_spec::types::error::{
    family_path, unit_path, ErrorEntry, ValidationReport, E_IDENTIFIER_COLLISION,
    E_UNSUPPORTED_NAME,
};
use unitgen_spec::types::schema::SchemaSpec;

/// Check that every synthesized identifier and composite title is unique
/// across the module. Unlike IR conversion, which stops at the first clash,
/// every collision is reported.
///
/// Names with non-ASCII letters or digits are rejected: identifiers keep
/// ASCII only, so "Ångström" would become the unexported Go name "ngstrm".
pub fn check(schema: &SchemaSpec, file: &str, report: &mut ValidationReport) {
    let mut owners: HashMap<String, String> = ident::PREAMBLE_NAMES
        .iter()
        .map(|name| (name.to_string(), "the module preamble".to_string()))
        .collect();
    let mut composites: HashMap<String, String> = HashMap::new();

    for (fi, family) in schema.definitions.iter().enumerate() {
        let family_title = ident::title(&family.kind);
        let owner = format!("family '{}'", family.kind);
        let path = format!("{}.type", family_path(fi));
        check_name(file, &family.kind, &path, report);
        claim(
            file,
            &mut owners,
            ident::family_type_ident(&family_title),
            owner.clone(),
            path.clone(),
            report,
        );
        claim(
            file,
            &mut owners,
            ident::family_var_ident(&family_title),
            owner,
            path,
            report,
        );

        for (ui, unit) in family.units.iter().enumerate() {
            let unit_title = ident::title(&unit.name);
            let owner = format!("unit '{}' of family '{}'", unit.name, family.kind);
            let path = format!("{}.name", unit_path(fi, ui));
            check_name(file, &unit.name, &path, report);
            claim(
                file,
                &mut owners,
                ident::unit_type_ident(&unit_title, &family_title),
                owner.clone(),
                path.clone(),
                report,
            );
            claim(
                file,
                &mut owners,
                ident::unit_var_ident(&unit_title, &family_title),
                owner.clone(),
                path.clone(),
                report,
            );
            claim(
                file,
                &mut composites,
                ident::composite_title(&family_title, &unit_title),
                owner,
                path,
                report,
            );
        }
    }
}

fn check_name(file: &str, name: &str, path: &str, report: &mut ValidationReport) {
    let dropped = ident::dropped_chars(name);
    if dropped.is_empty() {
        return;
    }
    let listed: Vec<String> = dropped.iter().map(|c| format!("'{c}'")).collect();
    report.push(
        ErrorEntry::error(
            E_UNSUPPORTED_NAME,
            format!(
                "Name '{name}' contains {} which generated identifiers cannot carry",
                listed.join(", ")
            ),
            file,
            path,
        )
        .with_suggestion("Spell the name in ASCII and keep the original spelling as an alias"),
    );
}

fn claim(
    file: &str,
    table: &mut HashMap<String, String>,
    identifier: String,
    owner: String,
    path: String,
    report: &mut ValidationReport,
) {
    match table.get(&identifier) {
        Some(first) => report.push(
            ErrorEntry::error(
                E_IDENTIFIER_COLLISION,
                format!("Identifier '{identifier}' is generated for both {first} and {owner}"),
                file,
                &path,
            )
            .with_suggestion("Rename one of them so their generated names differ"),
        ),
        None => {
            table.insert(identifier, owner);
        }
    }
}

use unitgen_ir::ident;
use unitgen_spec::types::error::{
    family_path, unit_path, ErrorEntry, ValidationReport, E_UNPORTABLE_ALIAS,
};
use unitgen_spec::types::schema::SchemaSpec;

/// Warn about aliases the generated targets may normalize differently.
///
/// Go lower-cases rune by rune, TypeScript applies full and context-sensitive
/// case mapping, and the two disagree on some whitespace. An alias with a
/// non-ASCII cased letter or non-ASCII space can match in one target and
/// miss in the other. Symbols such as `°` are unaffected.
pub fn check(schema: &SchemaSpec, file: &str, report: &mut ValidationReport) {
    for (fi, family) in schema.definitions.iter().enumerate() {
        for (ai, alias) in family.matches.iter().enumerate() {
            check_alias(file, alias, &format!("{}.matches[{}]", family_path(fi), ai), report);
        }
        for (ui, unit) in family.units.iter().enumerate() {
            for (ai, alias) in unit.matches.iter().enumerate() {
                let path = format!("{}.matches[{}]", unit_path(fi, ui), ai);
                check_alias(file, alias, &path, report);
            }
        }
    }
}

fn check_alias(file: &str, alias: &str, path: &str, report: &mut ValidationReport) {
    let chars = ident::unportable_chars(alias);
    if chars.is_empty() {
        return;
    }
    let listed: Vec<String> = chars.iter().map(|c| format!("U+{:04X}", u32::from(*c))).collect();
    report.push(
        ErrorEntry::warning(
            E_UNPORTABLE_ALIAS,
            format!(
                "Alias '{alias}' contains {} which Go and TypeScript may normalize differently",
                listed.join(", ")
            ),
            file,
            path,
        )
        .with_suggestion("Add an ASCII spelling of the alias as well"),
    );
}

pub mod go_lang;
pub mod typescript;

use unitgen_ir::types::{FamilyIR, UnitIR};
use unitgen_spec::Language;

use crate::context::{EmitContext, IndentStyle};
use crate::traits::LanguageEmitter;

/// Create the appropriate language emitter for the given language.
pub fn create_emitter(language: Language) -> Box<dyn LanguageEmitter> {
    match language {
        Language::Go => Box::new(go_lang::GoEmitter),
        Language::Typescript => Box::new(typescript::TypeScriptEmitter),
    }
}

/// First line of every generated module. Matches the Go convention
/// `^// Code generated .* DO NOT EDIT\.$`, which TypeScript tooling also honors.
pub(crate) fn banner(version: &str) -> String {
    format!(
        "// Code generated by unitgen from schema version {}. DO NOT EDIT.",
        comment_text(version)
    )
}

/// Double-quoted string literal. JSON escapes are valid in Go and TypeScript.
pub(crate) fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("{text:?}"))
}

/// Comma-separated quoted literals.
pub(crate) fn quote_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| quote(item.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Text safe to place after `//`.
pub(crate) fn comment_text(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Text safe to place inside a `/** ... */` block.
pub(crate) fn doc_text(text: &str) -> String {
    comment_text(text).replace("*/", "*\\/")
}

/// Multi-line literal: `open`, one row per line one level deeper, `close`.
/// Rows carry their own trailing separators.
pub(crate) fn literal(style: IndentStyle, open: &str, rows: &[String], close: &str) -> String {
    let mut ctx = EmitContext::new(style);
    ctx.push_indent();
    let mut lines = vec![open.to_string()];
    lines.extend(rows.iter().map(|row| ctx.line(row)));
    lines.push(close.to_string());
    lines.join("\n")
}

/// Symbol if the unit has one, else its name.
pub(crate) fn label(unit: &UnitIR) -> &str {
    if unit.symbol.is_empty() {
        &unit.name
    } else {
        &unit.symbol
    }
}

/// Header comment of a unit block: owning family, base, and both
/// conversions with the symbols they produce, aligned in columns.
pub(crate) fn unit_summary(family: &FamilyIR, unit: &UnitIR) -> Vec<String> {
    let base = family.base_unit();
    let from = comment_text(&unit.from_base_source);
    let to = comment_text(&unit.to_base_source);
    let width = from.chars().count().max(to.chars().count());

    vec![
        format!("// {} (Unit)", unit.type_ident),
        format!("// UnitType     : {}", family.type_ident),
        format!("// UnitType.Base: {}", base.type_ident),
        format!("// Unit.FromBase: {from:<width$} = {}", comment_text(&unit.symbol)),
        format!("// Unit.ToBase  : {to:<width$} = {}", comment_text(&base.symbol)),
    ]
    .into_iter()
    .map(|line| line.trim_end().to_string())
    .collect()
}

/// Header comment of a family block: every member with its `fromBase`
/// expression and symbol, then the base unit.
pub(crate) fn family_summary(family: &FamilyIR) -> Vec<String> {
    let ident_width = family
        .units
        .iter()
        .map(|u| u.type_ident.chars().count())
        .max()
        .unwrap_or(0);
    let from_width = family
        .units
        .iter()
        .map(|u| comment_text(&u.from_base_source).chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = vec![
        format!("// {} (UnitType)", family.type_ident),
        format!("// Contains {} units:", family.units.len()),
    ];
    for unit in &family.units {
        let line = format!(
            "//  - {:<ident_width$} {:<from_width$} = {}",
            unit.type_ident,
            comment_text(&unit.from_base_source),
            comment_text(&unit.symbol),
        );
        lines.push(line.trim_end().to_string());
    }
    lines.push(format!("// Base: {}", family.base_unit().type_ident));
    lines
}

#[cfg(test)]
pub(crate) mod test_support {
    use unitgen_ir::convert_schema;
    use unitgen_ir::types::ModuleIR;
    use unitgen_spec::types::schema::{FamilySpec, SchemaSpec, UnitSpec};

    pub fn unit(name: &str, symbol: &str, from: &str, to: &str, matches: &[&str]) -> UnitSpec {
        UnitSpec {
            name: name.to_string(),
            symbol: symbol.to_string(),
            from_base: from.to_string(),
            to_base: to.to_string(),
            matches: matches.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn family(kind: &str, base: &str, matches: &[&str], units: Vec<UnitSpec>) -> FamilySpec {
        FamilySpec {
            kind: kind.to_string(),
            base_unit: base.to_string(),
            matches: matches.iter().map(|s| s.to_string()).collect(),
            units,
        }
    }

    /// Temperature, a Pressure family whose base shares its title, and Number.
    pub fn schema() -> SchemaSpec {
        SchemaSpec {
            version: "1.0.0".to_string(),
            definitions: vec![
                family(
                    "Temperature",
                    "Celsius",
                    &["temperature", "temp"],
                    vec![
                        unit("Celsius", "°C", "c=>c", "c=>c", &["c", "celsius"]),
                        unit(
                            "Fahrenheit",
                            "°F",
                            "f=>(f-32)*5/9",
                            "c=>c*9/5+32",
                            &["f", "fahrenheit"],
                        ),
                    ],
                ),
                family(
                    "Pressure",
                    "Pressure",
                    &["pressure"],
                    vec![
                        unit("Pressure", "Pa", "p => p", "p => p", &["pa", "pascal"]),
                        unit("Kilo Pascal", "kPa", "in => in / 1000", "in => in * 1000", &["kpa"]),
                    ],
                ),
                family(
                    "Number",
                    "Number",
                    &["number"],
                    vec![unit("Number", "", "x => x", "x => x", &["number", "*"])],
                ),
            ],
        }
    }

    pub fn module() -> ModuleIR {
        convert_schema(&schema()).unwrap()
    }
}

use std::sync::OnceLock;

use regex::Regex;

use unitgen_ir::conversion::ConversionIR;
use unitgen_spec::types::error::{
    unit_path, ErrorEntry, ValidationReport, E_MALFORMED_CONVERSION, E_UNUSED_PARAMETER,
};
use unitgen_spec::types::schema::SchemaSpec;

fn param_regex() -> &'static Regex {
    static PARAM: OnceLock<Regex> = OnceLock::new();
    PARAM.get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid regex"))
}

/// Lexical check of every `fromBase`/`toBase` expression.
///
/// Formulas are otherwise opaque: only the splice shape, the parameter name
/// and bracket balance are checked here.
pub fn check(schema: &SchemaSpec, file: &str, report: &mut ValidationReport) {
    for (fi, family) in schema.definitions.iter().enumerate() {
        for (ui, unit) in family.units.iter().enumerate() {
            for (field, source) in [("fromBase", &unit.from_base), ("toBase", &unit.to_base)] {
                let path = format!("{}.{}", unit_path(fi, ui), field);
                let context = format!("{} of '{}' in '{}'", field, unit.name, family.kind);
                check_expression(source, &context, file, &path, report);
            }
        }
    }
}

fn check_expression(
    source: &str,
    context: &str,
    file: &str,
    path: &str,
    report: &mut ValidationReport,
) {
    let conversion = match ConversionIR::parse(source) {
        Ok(conversion) => conversion,
        Err(err) => {
            report.push(
                ErrorEntry::error(
                    E_MALFORMED_CONVERSION,
                    format!("Malformed {context}: {err}"),
                    file,
                    path,
                )
                .with_suggestion("Write the conversion as '<param> => <formula>', e.g. 'x => x * 1000'"),
            );
            return;
        }
    };

    if !param_regex().is_match(&conversion.param) {
        report.push(
            ErrorEntry::error(
                E_MALFORMED_CONVERSION,
                format!(
                    "Parameter '{}' of {context} is not a plain identifier",
                    conversion.param
                ),
                file,
                path,
            )
            .with_suggestion("Use a single name such as 'x' before '=>'"),
        );
        return;
    }

    if let Some(message) = bracket_imbalance(&conversion.body) {
        report.push(
            ErrorEntry::error(
                E_MALFORMED_CONVERSION,
                format!("Formula of {context} has {message}"),
                file,
                path,
            ),
        );
        return;
    }

    if !conversion.mentions_param() {
        report.push(
            ErrorEntry::warning(
                E_UNUSED_PARAMETER,
                format!(
                    "Formula of {context} does not use its parameter '{}'",
                    conversion.param
                ),
                file,
                path,
            )
            .with_suggestion("A constant conversion is rarely intended; check the formula"),
        );
    }
}

fn bracket_imbalance(body: &str) -> Option<String> {
    let mut depth = 0usize;
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(format!("an unmatched ')' at offset {i}")),
            ')' => depth -= 1,
            _ => {}
        }
    }
    match depth {
        0 => None,
        1 => Some("1 unclosed '('".to_string()),
        n => Some(format!("{n} unclosed '('")),
    }
}

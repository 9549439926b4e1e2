use unitgen_ir::ident;
use unitgen_ir::types::{FamilyIR, ModuleIR, UnitIR};
use unitgen_spec::Language;

use super::{banner, doc_text, family_summary, label, literal, quote, quote_list, unit_summary};
use crate::context::{EmitContext, IndentStyle};
use crate::generator::EmitOptions;
use crate::statement::StatementIR;
use crate::traits::LanguageEmitter;

/// Reserved and strict-mode reserved words of TypeScript/ECMAScript, plus
/// `eval` and `arguments`, which strict mode forbids as parameter names.
pub const TS_RESERVED: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while", "with", "yield", "let", "static",
    "implements", "interface", "package", "private", "protected", "public", "await", "eval",
    "arguments",
];

const UNIT_INTERFACE: &[&str] = &[
    "/** A scalar unit which converts to and from the base unit of its UnitType. */",
    "export interface Unit {",
    "  /** Used for code interfaces */",
    "  title(): string;",
    "  /** Used for displays */",
    "  name(): string;",
    "  /** Can be displayed beside scalars */",
    "  symbol(): string;",
    "  /** Converts a value in the base unit of the UnitType to this unit */",
    "  fromBase(value: number): number;",
    "  /** Converts a value in this unit to the base unit of the UnitType */",
    "  toBase(value: number): number;",
    "  /** Ordered free-text aliases of this unit */",
    "  matchList(): readonly string[];",
    "  /** Whether a free-text string names this unit */",
    "  matches(check: string): boolean;",
    "  /** The UnitType of this unit */",
    "  typeOf(): UnitType;",
    "  /** The base Unit of this unit's UnitType */",
    "  base(): Unit;",
    "}",
];

const FAMILY_INTERFACE: &[&str] = &[
    "/** A family of related units sharing one base unit. */",
    "export interface UnitType {",
    "  title(): string;",
    "  name(): string;",
    "  /** The unit every conversion of this family goes through */",
    "  base(): Unit;",
    "  /** Units of this family in declaration order */",
    "  units(): readonly Unit[];",
    "  unitList(): string[];",
    "  matchList(): readonly string[];",
    "  matches(check: string): boolean;",
    "}",
];

const RESOLVER_TABLES: &[&str] = &[
    "interface ResolverTables {",
    "  readonly familyAliases: readonly (readonly [string, UnitType])[];",
    "  readonly unitAliases: readonly (readonly [string, Unit])[];",
    "  readonly composites: readonly (readonly [string, Unit])[];",
    "}",
    "",
    "let tables: ResolverTables | undefined;",
];

/// TypeScript language emitter.
pub struct TypeScriptEmitter;

impl LanguageEmitter for TypeScriptEmitter {
    fn language(&self) -> Language {
        Language::Typescript
    }

    fn emit_header(&self, module: &ModuleIR, _options: &EmitOptions) -> String {
        banner(&module.version)
    }

    fn emit_preamble(&self, _module: &ModuleIR, ctx: &mut EmitContext) -> String {
        let normalize = self.function(
            ctx,
            "Lower-cases `s` and strips all whitespace.",
            "export function normalize(s: string): string",
            &[StatementIR::ret("s.toLowerCase().replace(/\\s+/g, \"\")")],
        );
        let composite = self.function(
            ctx,
            "Key of one exact (family, unit) pair, as accepted by `resolveFamilyAndUnit`.",
            "export function compositeTitle(familyTitle: string, unitTitle: string): string",
            &[StatementIR::ret(format!(
                "familyTitle + {} + unitTitle",
                quote(ident::COMPOSITE_SEPARATOR)
            ))],
        );
        let match_any = self.function(
            ctx,
            "Whether `check` equals one of `aliases` after normalization.",
            "function matchAny(aliases: readonly string[], check: string): boolean",
            &[
                StatementIR::let_("normalized", "normalize(check)"),
                StatementIR::for_(
                    "alias",
                    "aliases",
                    vec![
                        StatementIR::let_("key", "normalize(alias)"),
                        StatementIR::if_(
                            format!(
                                "(key === {} && normalized !== \"\") || key === normalized",
                                quote(ident::WILDCARD)
                            ),
                            vec![StatementIR::ret("true")],
                        ),
                    ],
                ),
                StatementIR::ret("false"),
            ],
        );

        [
            UNIT_INTERFACE.join("\n"),
            FAMILY_INTERFACE.join("\n"),
            normalize,
            composite,
            match_any,
        ]
        .join("\n\n")
    }

    fn emit_lookup_tables(&self, module: &ModuleIR, ctx: &mut EmitContext) -> String {
        let tables = &module.tables;
        let fallback_family = &module.fallback_family().var_ident;
        let fallback_unit = &module.fallback_unit().var_ident;

        let family_rows: Vec<String> = tables
            .family_aliases
            .iter()
            .map(|e| format!("[{}, {}],", quote(&e.alias), module.family(e.family).var_ident))
            .collect();
        let unit_rows: Vec<String> = tables
            .unit_aliases
            .iter()
            .map(|e| format!("[{}, {}],", quote(&e.key), module.unit(e.unit).var_ident))
            .collect();
        let composite_rows: Vec<String> = tables
            .composites
            .iter()
            .map(|e| format!("[{}, {}],", quote(&e.title), module.unit(e.unit).var_ident))
            .collect();
        let frozen: Vec<String> = ["familyAliases", "unitAliases", "composites"]
            .iter()
            .map(|name| format!("{name}: Object.freeze({name}),"))
            .collect();

        let init = self.function(
            ctx,
            "Built on first use, once every singleton below is initialized.",
            "function initTables(): ResolverTables",
            &[
                StatementIR::let_("familyAliases: [string, UnitType][]", array(&family_rows)),
                StatementIR::let_("unitAliases: [string, Unit][]", array(&unit_rows)),
                StatementIR::let_("composites: [string, Unit][]", array(&composite_rows)),
                StatementIR::ret(literal(self.indent_style(), "Object.freeze({", &frozen, "})")),
            ],
        );
        let lookup = self.function(
            ctx,
            "",
            "function lookupTables(): ResolverTables",
            &[
                StatementIR::if_(
                    "tables === undefined",
                    vec![StatementIR::assign("tables", "initTables()")],
                ),
                StatementIR::ret("tables"),
            ],
        );

        let resolve_family = self.function(
            ctx,
            &format!(
                "First family, in declaration order, with an alias matching `input`, or `{fallback_family}`."
            ),
            "export function resolveFamily(input: string): UnitType",
            &[
                StatementIR::let_("normalized", "normalize(input)"),
                StatementIR::for_(
                    "[alias, family]",
                    "lookupTables().familyAliases",
                    vec![StatementIR::if_(
                        format!(
                            "alias === normalized || (alias === {} && normalized !== \"\")",
                            quote(ident::WILDCARD)
                        ),
                        vec![StatementIR::ret("family")],
                    )],
                ),
                StatementIR::ret(fallback_family.as_str()),
            ],
        );
        let resolve_unit = self.function(
            ctx,
            &format!("Unit of `family` with an alias matching `input`, or `{fallback_unit}`."),
            "export function resolveUnit(input: string, family: UnitType): Unit",
            &[
                StatementIR::let_("normalized", "normalize(input)"),
                StatementIR::let_(
                    "search",
                    format!(
                        "family.title() + {} + normalized",
                        quote(ident::UNIT_KEY_SEPARATOR)
                    ),
                ),
                StatementIR::let_(
                    "wildcard",
                    format!(
                        "family.title() + {}",
                        quote(&format!("{}{}", ident::UNIT_KEY_SEPARATOR, ident::WILDCARD))
                    ),
                ),
                StatementIR::for_(
                    "[key, unit]",
                    "lookupTables().unitAliases",
                    vec![StatementIR::if_(
                        "key === search || (key === wildcard && normalized !== \"\")",
                        vec![StatementIR::ret("unit")],
                    )],
                ),
                StatementIR::ret(fallback_unit.as_str()),
            ],
        );
        let resolve_pair = self.function(
            ctx,
            &format!(
                "Exact (family, unit) pair named by a composite title, or `[{fallback_family}, {fallback_unit}]`. Case-sensitive."
            ),
            "export function resolveFamilyAndUnit(title: string): [UnitType, Unit]",
            &[
                StatementIR::for_(
                    "[key, unit]",
                    "lookupTables().composites",
                    vec![StatementIR::if_(
                        "key === title",
                        vec![StatementIR::ret("[unit.typeOf(), unit]")],
                    )],
                ),
                StatementIR::ret(format!("[{fallback_family}, {fallback_unit}]")),
            ],
        );

        [
            RESOLVER_TABLES.join("\n"),
            init,
            lookup,
            resolve_family,
            resolve_unit,
            resolve_pair,
        ]
        .join("\n\n")
    }

    fn emit_descriptive_tables(&self, module: &ModuleIR, ctx: &mut EmitContext) -> String {
        let tables = &module.tables;

        let family_titles = self.function(
            ctx,
            "Title of every family in declaration order.",
            "export function familyTitles(): string[]",
            &[StatementIR::ret(format!("[{}]", quote_list(&tables.family_titles)))],
        );

        let rows: Vec<String> = tables
            .units_by_family
            .iter()
            .map(|(family, units)| format!("{}: [{}],", quote(family), quote_list(units)))
            .collect();
        let units_by_family = self.function(
            ctx,
            "Every family title mapped to the names of its units.",
            "export function unitsByFamily(): Record<string, string[]>",
            &[StatementIR::ret(literal(self.indent_style(), "{", &rows, "}"))],
        );

        let composite_titles = self.function(
            ctx,
            "Composite title of every (family, unit) pair.",
            "export function compositeTitles(): string[]",
            &[StatementIR::ret("lookupTables().composites.map(([title]) => title)")],
        );

        [family_titles, units_by_family, composite_titles].join("\n\n")
    }

    fn emit_family(&self, family: &FamilyIR, ctx: &mut EmitContext) -> String {
        let name = &family.type_ident;
        let unit_vars: Vec<&str> = family.units.iter().map(|u| u.var_ident.as_str()).collect();

        let mut lines = family_summary(family);
        lines.push(ctx.line(format!("export class {name} implements UnitType {{")));
        ctx.push_indent();
        let methods = [
            self.method(ctx, "title(): string", quote(&family.title)),
            self.method(ctx, "name(): string", quote(&family.name)),
            self.method(ctx, "base(): Unit", family.base_unit().var_ident.as_str()),
            self.method(
                ctx,
                "units(): readonly Unit[]",
                format!("[{}]", unit_vars.join(", ")),
            ),
            self.method(
                ctx,
                "unitList(): string[]",
                format!("[{}]", quote_list(&family.unit_names())),
            ),
            self.method(
                ctx,
                "matchList(): readonly string[]",
                format!("[{}]", quote_list(&family.aliases)),
            ),
            self.method(
                ctx,
                "matches(check: string): boolean",
                "matchAny(this.matchList(), check)",
            ),
        ];
        ctx.pop_indent();
        lines.push(methods.join("\n\n"));
        lines.push(ctx.line("}"));

        [
            lines.join("\n"),
            format!(
                "/** The {} family. */\nexport const {} = new {name}();",
                doc_text(&family.name),
                family.var_ident
            ),
        ]
        .join("\n\n")
    }

    fn emit_unit(&self, family: &FamilyIR, unit: &UnitIR, ctx: &mut EmitContext) -> String {
        let name = &unit.type_ident;
        let base = family.base_unit();
        let from_base = unit.from_base.for_target(self.reserved_words());
        let to_base = unit.to_base.for_target(self.reserved_words());

        let mut lines = unit_summary(family, unit);
        lines.push(ctx.line(format!("export class {name} implements Unit {{")));
        ctx.push_indent();
        lines.push(ctx.line(format!("protected readonly brand = {};", quote(name))));
        lines.push(String::new());
        lines.push(ctx.line("constructor(readonly value: number = 0) {}"));
        lines.push(String::new());
        let methods = [
            self.method(ctx, "title(): string", quote(&unit.title)),
            self.method(ctx, "name(): string", quote(&unit.name)),
            self.method(ctx, "symbol(): string", quote(&unit.symbol)),
            self.documented(
                ctx,
                &format!("Converts {} to {}.", label(base), label(unit)),
                &format!("fromBase({}: number): number", from_base.param),
                from_base.body.as_str(),
            ),
            self.documented(
                ctx,
                &format!("Converts {} to {}.", label(unit), label(base)),
                &format!("toBase({}: number): number", to_base.param),
                to_base.body.as_str(),
            ),
            self.method(
                ctx,
                "matchList(): readonly string[]",
                format!("[{}]", quote_list(&unit.aliases)),
            ),
            self.method(
                ctx,
                "matches(check: string): boolean",
                "matchAny(this.matchList(), check)",
            ),
            self.method(ctx, "typeOf(): UnitType", family.var_ident.as_str()),
            self.method(ctx, "base(): Unit", base.var_ident.as_str()),
            self.documented(
                ctx,
                "This value in the base unit of the family.",
                &format!("toBaseValue(): {}", base.type_ident),
                format!("new {}(this.toBase(this.value))", base.type_ident),
            ),
            self.documented(
                ctx,
                &format!("Converts a {} value to {name}.", base.type_ident),
                &format!("static fromBaseValue(base: {}): {name}", base.type_ident),
                format!("new {name}({}.fromBase(base.value))", unit.var_ident),
            ),
        ];
        ctx.pop_indent();
        lines.push(methods.join("\n\n"));
        lines.push(ctx.line("}"));

        [
            lines.join("\n"),
            format!(
                "/** The {} unit of {}. */\nexport const {} = new {name}();",
                doc_text(&unit.name),
                doc_text(&family.name),
                unit.var_ident
            ),
        ]
        .join("\n\n")
    }

    fn emit_statement(&self, stmt: &StatementIR, ctx: &mut EmitContext) -> String {
        match stmt {
            StatementIR::Let { name, value } => ctx.line(format!("const {name} = {value};")),
            StatementIR::Assign { target, value } => ctx.line(format!("{target} = {value};")),
            StatementIR::Return { value } => ctx.line(format!("return {value};")),
            StatementIR::If { condition, then_ } => {
                self.block(ctx, &format!("if ({condition}) {{"), then_)
            }
            StatementIR::For {
                binding,
                iterable,
                body,
            } => self.block(ctx, &format!("for (const {binding} of {iterable}) {{"), body),
        }
    }

    fn emit_imports(&self, _ctx: &mut EmitContext) -> String {
        // the module is self-contained
        String::new()
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        TS_RESERVED
    }

    fn file_extension(&self) -> &str {
        "ts"
    }

    fn indent_style(&self) -> IndentStyle {
        IndentStyle::Spaces(2)
    }
}

impl TypeScriptEmitter {
    /// `head`, the body one level deeper, then the closing brace.
    fn block(&self, ctx: &mut EmitContext, head: &str, body: &[StatementIR]) -> String {
        let mut lines = vec![ctx.line(head)];
        lines.extend(self.emit_block(body, ctx));
        lines.push(ctx.line("}"));
        lines.join("\n")
    }

    /// A function or class member with an optional JSDoc line.
    fn function(
        &self,
        ctx: &mut EmitContext,
        doc: &str,
        signature: &str,
        body: &[StatementIR],
    ) -> String {
        let mut lines = Vec::new();
        if !doc.is_empty() {
            lines.push(ctx.line(format!("/** {} */", doc_text(doc))));
        }
        lines.push(self.block(ctx, &format!("{signature} {{"), body));
        lines.join("\n")
    }

    /// A class member that returns `value`.
    fn method(&self, ctx: &mut EmitContext, signature: &str, value: impl Into<String>) -> String {
        self.function(ctx, "", signature, &[StatementIR::ret(value)])
    }

    fn documented(
        &self,
        ctx: &mut EmitContext,
        doc: &str,
        signature: &str,
        value: impl Into<String>,
    ) -> String {
        self.function(ctx, doc, signature, &[StatementIR::ret(value)])
    }
}

/// Array literal with one row per line, or `[]`.
fn array(rows: &[String]) -> String {
    if rows.is_empty() {
        return "[]".to_string();
    }
    literal(IndentStyle::Spaces(2), "[", rows, "]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::test_support::module;
    use pretty_assertions::assert_eq;

    fn ctx() -> EmitContext {
        EmitContext::new(IndentStyle::Spaces(2))
    }

    #[test]
    fn test_header_is_banner_only() {
        let module = module();
        assert_eq!(
            TypeScriptEmitter.emit_header(&module, &EmitOptions::default()),
            "// Code generated by unitgen from schema version 1.0.0. DO NOT EDIT."
        );
    }

    #[test]
    fn test_preamble() {
        let module = module();
        let mut ctx = ctx();
        let code = TypeScriptEmitter.emit_preamble(&module, &mut ctx);
        assert!(code.contains("export interface Unit {"));
        assert!(code.contains("export interface UnitType {"));
        assert!(code.contains(
            "export function normalize(s: string): string {\n  return s.toLowerCase().replace(/\\s+/g, \"\");\n}"
        ));
        assert!(code.contains("  return familyTitle + \"_\" + unitTitle;\n"));
        assert_eq!(TypeScriptEmitter.emit_imports(&mut ctx), "");
    }

    #[test]
    fn test_unit_class() {
        let module = module();
        let temperature = module.family(0);
        let code = TypeScriptEmitter.emit_unit(temperature, &temperature.units[1], &mut ctx());

        assert!(code.contains("export class FahrenheitTemperature implements Unit {\n  protected readonly brand = \"FahrenheitTemperature\";\n"));
        assert!(code.contains("  constructor(readonly value: number = 0) {}\n"));
        assert!(code.contains(
            "  /** Converts °C to °F. */\n  fromBase(f: number): number {\n    return (f-32)*5/9;\n  }"
        ));
        assert!(code.contains("  toBase(c: number): number {\n    return c*9/5+32;\n  }"));
        assert!(code.contains("  typeOf(): UnitType {\n    return TemperatureUnitType;\n  }"));
        assert!(code.contains(
            "  static fromBaseValue(base: CelsiusTemperature): FahrenheitTemperature {\n    return new FahrenheitTemperature(FahrenheitTemperatureUnit.fromBase(base.value));\n  }"
        ));
        assert!(code.ends_with("export const FahrenheitTemperatureUnit = new FahrenheitTemperature();"));
    }

    #[test]
    fn test_reserved_param_renamed() {
        let module = module();
        let pressure = module.family(1);
        let code = TypeScriptEmitter.emit_unit(pressure, &pressure.units[1], &mut ctx());
        assert!(code.contains("  fromBase(in_: number): number {\n    return in_ / 1000;\n  }"));
        assert!(code.contains("  toBase(in_: number): number {\n    return in_ * 1000;\n  }"));
        // the source expression in the header comment is untouched
        assert!(code.contains("// Unit.FromBase: in => in / 1000"));
    }

    #[test]
    fn test_family_class() {
        let module = module();
        let code = TypeScriptEmitter.emit_family(module.family(1), &mut ctx());
        assert!(code.contains("// Base: _PressurePressure\nexport class Pressure implements UnitType {"));
        assert!(code.contains("  base(): Unit {\n    return _PressurePressureUnit;\n  }"));
        assert!(code.contains("  units(): readonly Unit[] {\n    return [_PressurePressureUnit, KiloPascalPressureUnit];\n  }"));
        assert!(code.ends_with("export const PressureUnitType = new Pressure();"));
    }

    #[test]
    fn test_lookup_tables_are_lazy_and_frozen() {
        let module = module();
        let code = TypeScriptEmitter.emit_lookup_tables(&module, &mut ctx());
        assert!(code.contains("let tables: ResolverTables | undefined;"));
        assert!(code.contains("  const familyAliases: [string, UnitType][] = [\n    [\"temperature\", TemperatureUnitType],\n"));
        assert!(code.contains("    [\"Temperature->f\", FahrenheitTemperatureUnit],\n"));
        assert!(code.contains("    [\"Number_Number\", _NumberNumberUnit],\n"));
        assert!(code.contains("  return Object.freeze({\n"));
        assert!(code.contains("  if (tables === undefined) {\n    tables = initTables();\n  }"));
        assert!(code.contains("  return [NumberUnitType, _NumberNumberUnit];\n}"));
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(array(&[]), "[]");
        let mut module = module();
        module.tables.composites.clear();
        let code = TypeScriptEmitter.emit_lookup_tables(&module, &mut ctx());
        assert!(code.contains("  const composites: [string, Unit][] = [];\n"));
    }

    #[test]
    fn test_match_any_normalizes_wildcard_alias() {
        let code = TypeScriptEmitter.emit_preamble(&module(), &mut ctx());
        assert!(code.contains(
            "  const normalized = normalize(check);\n  for (const alias of aliases) {\n    const key = normalize(alias);\n    if ((key === \"*\" && normalized !== \"\") || key === normalized) {\n      return true;\n    }\n  }\n  return false;\n}"
        ));
    }

    #[test]
    fn test_strict_mode_names_renamed() {
        let mut module = module();
        let unit = &mut module.families[1].units[1];
        unit.from_base = unitgen_ir::ConversionIR::parse("eval => eval / 1000").unwrap();
        unit.to_base = unitgen_ir::ConversionIR::parse("arguments => arguments * 1000").unwrap();
        let pressure = module.family(1);
        let code = TypeScriptEmitter.emit_unit(pressure, &pressure.units[1], &mut ctx());
        assert!(code.contains("  fromBase(eval_: number): number {\n    return eval_ / 1000;\n  }"));
        assert!(code.contains(
            "  toBase(arguments_: number): number {\n    return arguments_ * 1000;\n  }"
        ));
    }

    #[test]
    fn test_names_cannot_close_doc_comments() {
        let mut module = module();
        module.families[0].name = "Temp */ erature".to_string();
        module.families[0].units[1].name = "Fahren\nheit".to_string();
        module.families[0].units[1].symbol = "°F */ export const x = 1; /*".to_string();
        let temperature = module.family(0);

        let family = TypeScriptEmitter.emit_family(temperature, &mut ctx());
        assert!(family.contains("/** The Temp *\\/ erature family. */\n"));
        let unit = TypeScriptEmitter.emit_unit(temperature, &temperature.units[1], &mut ctx());
        assert!(unit.contains("/** The Fahren heit unit of Temp *\\/ erature. */\n"));
        assert!(unit.contains("  /** Converts °C to °F *\\/ export const x = 1; /*. */\n"));
        for line in unit.lines().filter(|l| l.trim_start().starts_with("/**")) {
            assert_eq!(line.matches("*/").count(), 1, "{line}");
        }
    }

    #[test]
    fn test_descriptive_tables() {
        let module = module();
        let code = TypeScriptEmitter.emit_descriptive_tables(&module, &mut ctx());
        assert!(code.contains("  return [\"Temperature\", \"Pressure\", \"Number\"];"));
        assert!(code.contains("    \"Pressure\": [\"Pressure\", \"Kilo Pascal\"],\n"));
    }
}

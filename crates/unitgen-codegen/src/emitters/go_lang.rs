use unitgen_ir::ident;
use unitgen_ir::types::{FamilyIR, ModuleIR, UnitIR};
use unitgen_spec::Language;

use super::{banner, comment_text, family_summary, label, literal, quote, quote_list, unit_summary};
use crate::context::{EmitContext, IndentStyle};
use crate::generator::EmitOptions;
use crate::statement::StatementIR;
use crate::traits::LanguageEmitter;

/// Go keywords. Predeclared identifiers (`len`, `float64`, ...) may be
/// shadowed and are not listed.
pub const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

const UNIT_INTERFACE: &[&str] = &[
    "// Unit is a scalar unit which converts to and from the base unit of its UnitType.",
    "type Unit interface {",
    "\t// Title is used for code interfaces",
    "\tTitle() string",
    "\t// Name is used for displays",
    "\tName() string",
    "\t// Symbol can be displayed beside scalars",
    "\tSymbol() string",
    "\t// FromBase converts a value in the base unit of the UnitType to this unit",
    "\tFromBase(float64) float64",
    "\t// ToBase converts a value in this unit to the base unit of the UnitType",
    "\tToBase(float64) float64",
    "\t// MatchList is the ordered list of free-text aliases of this unit",
    "\tMatchList() []string",
    "\t// Matches reports whether a free-text string names this unit",
    "\tMatches(string) bool",
    "\t// TypeOf returns the UnitType of this unit",
    "\tTypeOf() UnitType",
    "\t// Base returns the base Unit of this unit's UnitType directly",
    "\tBase() Unit",
    "}",
];

const FAMILY_INTERFACE: &[&str] = &[
    "// UnitType is a family of related units sharing one base unit.",
    "type UnitType interface {",
    "\t// Title is used for code interfaces",
    "\tTitle() string",
    "\t// Name is used for displays",
    "\tName() string",
    "\t// Base returns the unit every conversion of this family goes through",
    "\tBase() Unit",
    "\t// Units returns the units of this family in declaration order",
    "\tUnits() []Unit",
    "\t// UnitList returns the names of the units of this family",
    "\tUnitList() []string",
    "\t// MatchList is the ordered list of free-text aliases of this family",
    "\tMatchList() []string",
    "\t// Matches reports whether a free-text string names this family",
    "\tMatches(string) bool",
    "}",
];

const TABLE_ENTRY_TYPES: &[&str] = &[
    "type familyAlias struct {",
    "\talias  string",
    "\tfamily UnitType",
    "}",
    "",
    "type unitAlias struct {",
    "\tkey  string",
    "\tunit Unit",
    "}",
    "",
    "type compositeEntry struct {",
    "\ttitle string",
    "\tunit  Unit",
    "}",
];

/// Go language emitter.
pub struct GoEmitter;

impl LanguageEmitter for GoEmitter {
    fn language(&self) -> Language {
        Language::Go
    }

    fn emit_header(&self, module: &ModuleIR, options: &EmitOptions) -> String {
        format!("{}\n\npackage {}", banner(&module.version), options.go_package)
    }

    fn emit_preamble(&self, _module: &ModuleIR, ctx: &mut EmitContext) -> String {
        ctx.add_import("strings");
        ctx.add_import("unicode");

        let mut closure_ctx = EmitContext::new(self.indent_style());
        let closure = self
            .emit_block(
                &[
                    StatementIR::if_("unicode.IsSpace(r)", vec![StatementIR::ret("-1")]),
                    StatementIR::ret("unicode.ToLower(r)"),
                ],
                &mut closure_ctx,
            )
            .join("\n");
        let normalize = self.func(
            ctx,
            "Normalize lower-cases s and strips all whitespace. Every alias comparison\n\
             is made between normalized strings.",
            "Normalize(s string) string",
            &[StatementIR::ret(format!(
                "strings.Map(func(r rune) rune {{\n{closure}\n}}, s)"
            ))],
        );
        let composite = self.func(
            ctx,
            "CompositeTitle is the key of one exact (family, unit) pair, as accepted by\n\
             ResolveFamilyAndUnit.",
            "CompositeTitle(familyTitle, unitTitle string) string",
            &[StatementIR::ret(format!(
                "familyTitle + {} + unitTitle",
                quote(ident::COMPOSITE_SEPARATOR)
            ))],
        );
        let match_any = self.func(
            ctx,
            "matchAny reports whether check equals one of aliases after normalization.\n\
             An alias that normalizes to the wildcard accepts any non-empty check.",
            "matchAny(aliases []string, check string) bool",
            &[
                StatementIR::assign("check", "Normalize(check)"),
                StatementIR::for_(
                    "alias",
                    "aliases",
                    vec![
                        StatementIR::let_("key", "Normalize(alias)"),
                        StatementIR::if_(
                            format!(
                                "(key == {} && check != \"\") || key == check",
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
            .map(|e| format!("{{{}, {}}},", quote(&e.alias), module.family(e.family).var_ident))
            .collect();
        let unit_rows: Vec<String> = tables
            .unit_aliases
            .iter()
            .map(|e| format!("{{{}, {}}},", quote(&e.key), module.unit(e.unit).var_ident))
            .collect();
        let composite_rows: Vec<String> = tables
            .composites
            .iter()
            .map(|e| format!("{{{}, {}}},", quote(&e.title), module.unit(e.unit).var_ident))
            .collect();

        let resolve_family = self.func(
            ctx,
            &format!(
                "ResolveFamily returns the first family, in declaration order, with an alias\n\
                 matching input, or {fallback_family}."
            ),
            "ResolveFamily(input string) UnitType",
            &[
                StatementIR::assign("input", "Normalize(input)"),
                StatementIR::for_(
                    "entry",
                    "familyAliasTable",
                    vec![StatementIR::if_(
                        format!(
                            "entry.alias == input || (entry.alias == {} && input != \"\")",
                            quote(ident::WILDCARD)
                        ),
                        vec![StatementIR::ret("entry.family")],
                    )],
                ),
                StatementIR::ret(fallback_family.as_str()),
            ],
        );
        let resolve_unit = self.func(
            ctx,
            &format!(
                "ResolveUnit returns the unit of family with an alias matching input, or\n\
                 {fallback_unit}."
            ),
            "ResolveUnit(input string, family UnitType) Unit",
            &[
                StatementIR::assign("input", "Normalize(input)"),
                StatementIR::let_(
                    "search",
                    format!(
                        "family.Title() + {} + input",
                        quote(ident::UNIT_KEY_SEPARATOR)
                    ),
                ),
                StatementIR::let_(
                    "wildcard",
                    format!(
                        "family.Title() + {}",
                        quote(&format!("{}{}", ident::UNIT_KEY_SEPARATOR, ident::WILDCARD))
                    ),
                ),
                StatementIR::for_(
                    "entry",
                    "unitAliasTable",
                    vec![StatementIR::if_(
                        "entry.key == search || (entry.key == wildcard && input != \"\")",
                        vec![StatementIR::ret("entry.unit")],
                    )],
                ),
                StatementIR::ret(fallback_unit.as_str()),
            ],
        );
        let resolve_pair = self.func(
            ctx,
            &format!(
                "ResolveFamilyAndUnit returns the exact (family, unit) pair named by a\n\
                 composite title, or ({fallback_family}, {fallback_unit}). The lookup is\n\
                 case-sensitive."
            ),
            "ResolveFamilyAndUnit(title string) (UnitType, Unit)",
            &[
                StatementIR::for_(
                    "entry",
                    "compositeTable",
                    vec![StatementIR::if_(
                        "entry.title == title",
                        vec![StatementIR::ret("entry.unit.TypeOf(), entry.unit")],
                    )],
                ),
                StatementIR::ret(format!("{fallback_family}, {fallback_unit}")),
            ],
        );

        [
            TABLE_ENTRY_TYPES.join("\n"),
            table(
                ctx,
                "familyAliasTable holds normalized family aliases in declaration order.",
                "familyAliasTable",
                "familyAlias",
                &family_rows,
            ),
            table(
                ctx,
                "unitAliasTable holds Title->alias keys in declaration order.",
                "unitAliasTable",
                "unitAlias",
                &unit_rows,
            ),
            table(
                ctx,
                "compositeTable holds the composite title of every (family, unit) pair.",
                "compositeTable",
                "compositeEntry",
                &composite_rows,
            ),
            resolve_family,
            resolve_unit,
            resolve_pair,
        ]
        .join("\n\n")
    }

    fn emit_descriptive_tables(&self, module: &ModuleIR, ctx: &mut EmitContext) -> String {
        let tables = &module.tables;

        let family_titles = self.func(
            ctx,
            "FamilyTitles returns the title of every family in declaration order.",
            "FamilyTitles() []string",
            &[StatementIR::ret(format!(
                "[]string{{{}}}",
                quote_list(&tables.family_titles)
            ))],
        );

        let key_width = tables
            .units_by_family
            .keys()
            .map(|k| quote(k).chars().count() + 1)
            .max()
            .unwrap_or(0);
        let rows: Vec<String> = tables
            .units_by_family
            .iter()
            .map(|(family, units)| {
                format!(
                    "{:<key_width$} {{{}}},",
                    format!("{}:", quote(family)),
                    quote_list(units)
                )
            })
            .collect();
        let units_by_family = self.func(
            ctx,
            "UnitsByFamily maps every family title to the names of its units.",
            "UnitsByFamily() map[string][]string",
            &[StatementIR::ret(literal(
                self.indent_style(),
                "map[string][]string{",
                &rows,
                "}",
            ))],
        );

        let composite_titles = self.func(
            ctx,
            "CompositeTitles returns the composite title of every (family, unit) pair.",
            "CompositeTitles() []string",
            &[
                StatementIR::let_("titles", "make([]string, 0, len(compositeTable))"),
                StatementIR::for_(
                    "entry",
                    "compositeTable",
                    vec![StatementIR::assign("titles", "append(titles, entry.title)")],
                ),
                StatementIR::ret("titles"),
            ],
        );

        [family_titles, units_by_family, composite_titles].join("\n\n")
    }

    fn emit_family(&self, family: &FamilyIR, ctx: &mut EmitContext) -> String {
        let name = &family.type_ident;
        let base = family.base_unit();
        let unit_vars: Vec<&str> = family.units.iter().map(|u| u.var_ident.as_str()).collect();

        let mut lines = family_summary(family);
        lines.push(format!("type {name} struct{{}}"));
        let mut blocks = vec![
            lines.join("\n"),
            format!(
                "// {} is the {} family.\nvar {} = {name}{{}}",
                family.var_ident,
                comment_text(&family.name),
                family.var_ident
            ),
        ];

        blocks.push(self.method(
            ctx,
            name,
            "Title returns the code-facing title of the family.",
            "Title() string",
            quote(&family.title),
        ));
        blocks.push(self.method(
            ctx,
            name,
            "Name returns the display name of the family.",
            "Name() string",
            quote(&family.name),
        ));
        blocks.push(self.method(
            ctx,
            name,
            "Base returns the unit every conversion of the family goes through.",
            "Base() Unit",
            base.var_ident.as_str(),
        ));
        blocks.push(self.method(
            ctx,
            name,
            "Units returns the units of the family in declaration order.",
            "Units() []Unit",
            format!("[]Unit{{{}}}", unit_vars.join(", ")),
        ));
        blocks.push(self.method(
            ctx,
            name,
            "UnitList returns the names of the units of the family.",
            "UnitList() []string",
            format!("[]string{{{}}}", quote_list(&family.unit_names())),
        ));
        blocks.push(self.method(
            ctx,
            name,
            "MatchList returns the free-text aliases of the family.",
            "MatchList() []string",
            format!("[]string{{{}}}", quote_list(&family.aliases)),
        ));
        blocks.push(self.method(
            ctx,
            &format!("t {name}"),
            "Matches reports whether check names the family, ignoring case and whitespace.",
            "Matches(check string) bool",
            "matchAny(t.MatchList(), check)",
        ));

        blocks.join("\n\n")
    }

    fn emit_unit(&self, family: &FamilyIR, unit: &UnitIR, ctx: &mut EmitContext) -> String {
        let name = &unit.type_ident;
        let base = family.base_unit();
        let from_base = unit.from_base.for_target(self.reserved_words());
        let to_base = unit.to_base.for_target(self.reserved_words());
        let unit_label = comment_text(label(unit));
        let base_label = comment_text(label(base));

        let mut lines = unit_summary(family, unit);
        lines.push(format!("type {name} struct {{"));
        lines.push("\tValue float64".to_string());
        lines.push("}".to_string());

        let mut blocks = vec![
            lines.join("\n"),
            format!(
                "// {} is the zero {} value, used as the {} unit of {}.\nvar {} = {name}{{}}",
                unit.var_ident,
                name,
                comment_text(&unit.name),
                comment_text(&family.name),
                unit.var_ident
            ),
        ];

        blocks.push(self.method(
            ctx,
            name,
            "Title returns the code-facing title of the unit.",
            "Title() string",
            quote(&unit.title),
        ));
        blocks.push(self.method(
            ctx,
            name,
            "Name returns the display name of the unit.",
            "Name() string",
            quote(&unit.name),
        ));
        blocks.push(self.method(
            ctx,
            name,
            "Symbol returns the symbol of the unit.",
            "Symbol() string",
            quote(&unit.symbol),
        ));
        blocks.push(self.method(
            ctx,
            name,
            &format!("FromBase converts {base_label} to {unit_label}."),
            &format!("FromBase({} float64) float64", from_base.param),
            from_base.body.as_str(),
        ));
        blocks.push(self.method(
            ctx,
            name,
            &format!("ToBase converts {unit_label} to {base_label}."),
            &format!("ToBase({} float64) float64", to_base.param),
            to_base.body.as_str(),
        ));
        blocks.push(self.method(
            ctx,
            name,
            "MatchList returns the free-text aliases of the unit.",
            "MatchList() []string",
            format!("[]string{{{}}}", quote_list(&unit.aliases)),
        ));
        blocks.push(self.method(
            ctx,
            &format!("u {name}"),
            "Matches reports whether check names the unit, ignoring case and whitespace.",
            "Matches(check string) bool",
            "matchAny(u.MatchList(), check)",
        ));
        blocks.push(self.method(
            ctx,
            name,
            "TypeOf returns the family of the unit.",
            "TypeOf() UnitType",
            family.var_ident.as_str(),
        ));
        blocks.push(self.method(
            ctx,
            name,
            "Base returns the base unit of the family.",
            "Base() Unit",
            base.var_ident.as_str(),
        ));
        blocks.push(self.method(
            ctx,
            &format!("u {name}"),
            "ToBaseValue converts the value to the base unit of the family.",
            &format!("ToBaseValue() {}", base.type_ident),
            format!("{}{{Value: u.ToBase(u.Value)}}", base.type_ident),
        ));
        blocks.push(self.method(
            ctx,
            &format!("u {name}"),
            &format!("FromBaseValue converts a {} value to {name}.", base.type_ident),
            &format!("FromBaseValue(base {}) {name}", base.type_ident),
            format!("{name}{{Value: u.FromBase(base.Value)}}"),
        ));

        blocks.join("\n\n")
    }

    fn emit_statement(&self, stmt: &StatementIR, ctx: &mut EmitContext) -> String {
        match stmt {
            StatementIR::Let { name, value } => ctx.line(format!("{name} := {value}")),
            StatementIR::Assign { target, value } => ctx.line(format!("{target} = {value}")),
            StatementIR::Return { value } => ctx.line(format!("return {value}")),
            StatementIR::If { condition, then_ } => {
                self.block(ctx, &format!("if {condition} {{"), then_)
            }
            StatementIR::For {
                binding,
                iterable,
                body,
            } => self.block(ctx, &format!("for _, {binding} := range {iterable} {{"), body),
        }
    }

    fn emit_imports(&self, ctx: &mut EmitContext) -> String {
        let imports = ctx.take_imports();
        if imports.is_empty() {
            return String::new();
        }
        let rows: Vec<String> = imports.iter().map(|path| quote(path)).collect();
        literal(self.indent_style(), "import (", &rows, ")")
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        GO_KEYWORDS
    }

    fn file_extension(&self) -> &str {
        "go"
    }

    fn indent_style(&self) -> IndentStyle {
        IndentStyle::Tabs
    }
}

impl GoEmitter {
    /// `head`, the body one level deeper, then the closing brace.
    fn block(&self, ctx: &mut EmitContext, head: &str, body: &[StatementIR]) -> String {
        let mut lines = vec![ctx.line(head)];
        lines.extend(self.emit_block(body, ctx));
        lines.push(ctx.line("}"));
        lines.join("\n")
    }

    /// A top-level function with a doc comment.
    fn func(
        &self,
        ctx: &mut EmitContext,
        doc: &str,
        signature: &str,
        body: &[StatementIR],
    ) -> String {
        let mut lines: Vec<String> = doc.lines().map(|l| ctx.line(format!("// {l}"))).collect();
        lines.push(self.block(ctx, &format!("func {signature} {{"), body));
        lines.join("\n")
    }

    /// A method with a value receiver that returns `value`. `receiver` is
    /// either a bare type, leaving the receiver unnamed, or `name Type`.
    fn method(
        &self,
        ctx: &mut EmitContext,
        receiver: &str,
        doc: &str,
        signature: &str,
        value: impl Into<String>,
    ) -> String {
        self.func(
            ctx,
            doc,
            &format!("({receiver}) {signature}"),
            &[StatementIR::ret(value)],
        )
    }
}

/// Package-level slice literal.
fn table(ctx: &mut EmitContext, doc: &str, name: &str, entry_type: &str, rows: &[String]) -> String {
    let value = if rows.is_empty() {
        format!("[]{entry_type}{{}}")
    } else {
        literal(IndentStyle::Tabs, &format!("[]{entry_type}{{"), rows, "}")
    };
    [ctx.line(format!("// {doc}")), ctx.line(format!("var {name} = {value}"))].join("\n")
}

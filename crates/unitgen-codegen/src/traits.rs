use unitgen_ir::types::{FamilyIR, ModuleIR, UnitIR};
use unitgen_spec::Language;

use crate::context::{EmitContext, IndentStyle};
use crate::generator::EmitOptions;
use crate::statement::StatementIR;

/// Language-specific module emitter.
///
/// Each target language implements this trait to serialize the module IR
/// into one complete source file. The assembler calls the `emit_*` methods in
/// module order and joins their output with blank lines.
pub trait LanguageEmitter {
    /// Which language this emitter targets.
    fn language(&self) -> Language;

    /// Generated-file banner plus anything that must precede imports
    /// (e.g., the Go package clause).
    fn emit_header(&self, module: &ModuleIR, options: &EmitOptions) -> String;

    /// Shared `Unit`/`UnitType` contracts, `normalize`, `compositeTitle` and
    /// the alias-matching helper.
    fn emit_preamble(&self, module: &ModuleIR, ctx: &mut EmitContext) -> String;

    /// Alias and composite tables with the three resolvers over them.
    fn emit_lookup_tables(&self, module: &ModuleIR, ctx: &mut EmitContext) -> String;

    /// Family titles, family → unit names, and composite titles.
    fn emit_descriptive_tables(&self, module: &ModuleIR, ctx: &mut EmitContext) -> String;

    /// Family type, its singleton and accessors. Unit blocks are emitted
    /// separately, right after.
    fn emit_family(&self, family: &FamilyIR, ctx: &mut EmitContext) -> String;

    /// Unit type, its singleton, accessors and conversions.
    fn emit_unit(&self, family: &FamilyIR, unit: &UnitIR, ctx: &mut EmitContext) -> String;

    /// Render one statement, nested blocks included, at the current indentation.
    fn emit_statement(&self, stmt: &StatementIR, ctx: &mut EmitContext) -> String;

    /// Render a block body one level deeper than the current indentation.
    fn emit_block(&self, body: &[StatementIR], ctx: &mut EmitContext) -> Vec<String> {
        ctx.push_indent();
        let lines = body.iter().map(|s| self.emit_statement(s, ctx)).collect();
        ctx.pop_indent();
        lines
    }

    /// Generate import statements from collected imports.
    fn emit_imports(&self, ctx: &mut EmitContext) -> String;

    /// Words a conversion parameter may not be named in this language.
    fn reserved_words(&self) -> &'static [&'static str];

    /// File extension for this language (e.g., "ts", "go").
    fn file_extension(&self) -> &str;

    /// Indentation style for this language.
    fn indent_style(&self) -> IndentStyle;
}

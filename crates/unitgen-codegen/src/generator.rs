use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use unitgen_ir::convert_schema;
use unitgen_ir::types::ModuleIR;
use unitgen_spec::types::schema::SchemaSpec;
use unitgen_spec::{GeneratorConfig, Language};

use crate::context::EmitContext;
use crate::emitters;
use crate::emitters::go_lang::GO_KEYWORDS;
use crate::error::CodegenError;
use crate::traits::LanguageEmitter;

/// Output options shared by every backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Package clause of the Go module
    pub go_package: String,
    /// File name, without extension, of every generated module
    pub file_stem: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            go_package: "units".to_string(),
            file_stem: "units".to_string(),
        }
    }
}

impl From<&GeneratorConfig> for EmitOptions {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            go_package: config.go_package.clone(),
            file_stem: config.file_stem.clone(),
        }
    }
}

impl EmitOptions {
    /// Reject a package name Go would not compile, or a stem that is not a
    /// plain file name.
    pub fn validate(&self) -> Result<(), CodegenError> {
        let pkg = &self.go_package;
        let mut chars = pkg.chars();
        let head_ok = matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_');
        let tail_ok = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !head_ok || !tail_ok || GO_KEYWORDS.contains(&pkg.as_str()) {
            return Err(CodegenError::InvalidPackage(pkg.clone()));
        }

        let stem = &self.file_stem;
        if stem.trim().is_empty()
            || stem.starts_with('.')
            || stem.contains(['/', '\\'])
            || stem.chars().any(char::is_control)
        {
            return Err(CodegenError::InvalidStem(stem.clone()));
        }
        Ok(())
    }
}

/// A collection of generated modules, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct GeneratedModules {
    /// Files keyed by relative path (sorted for deterministic output)
    files: BTreeMap<String, String>,
}

impl GeneratedModules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the output.
    pub fn add_file(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    /// Get all generated files.
    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }

    /// Content of one generated file.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Number of generated files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Write all generated files to the given output directory and return
    /// the paths written.
    pub fn write_to_disk(&self, output_dir: &Path) -> Result<Vec<PathBuf>, CodegenError> {
        let mut written = Vec::with_capacity(self.files.len());
        for (rel_path, content) in &self.files {
            let full_path = output_dir.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent).map_err(|source| CodegenError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            std::fs::write(&full_path, content).map_err(|source| CodegenError::Io {
                path: full_path.clone(),
                source,
            })?;
            info!(path = %full_path.display(), bytes = content.len(), "wrote module");
            written.push(full_path);
        }
        Ok(written)
    }
}

/// Renders one complete module for a single target language.
pub struct CodeGenerator {
    emitter: Box<dyn LanguageEmitter>,
    options: EmitOptions,
}

impl std::fmt::Debug for CodeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeGenerator")
            .field("language", &self.emitter.language())
            .field("options", &self.options)
            .finish()
    }
}

impl CodeGenerator {
    /// Create a code generator for the given language.
    pub fn new(language: Language, options: EmitOptions) -> Result<Self, CodegenError> {
        options.validate()?;
        Ok(Self {
            emitter: emitters::create_emitter(language),
            options,
        })
    }

    /// Relative path of the rendered module, e.g. `units.go`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.options.file_stem, self.emitter.file_extension())
    }

    /// Render the whole module: header, imports, preamble, lookup tables,
    /// descriptive tables, then every family followed by its units.
    pub fn render(&self, module: &ModuleIR) -> String {
        let mut ctx = self.new_context();

        let mut body = vec![
            self.emitter.emit_preamble(module, &mut ctx),
            self.emitter.emit_lookup_tables(module, &mut ctx),
            self.emitter.emit_descriptive_tables(module, &mut ctx),
        ];
        for family in &module.families {
            body.push(self.emitter.emit_family(family, &mut ctx));
            for unit in &family.units {
                body.push(self.emitter.emit_unit(family, unit, &mut ctx));
            }
        }

        let mut sections = vec![self.emitter.emit_header(module, &self.options)];
        let imports = self.emitter.emit_imports(&mut ctx);
        if !imports.is_empty() {
            sections.push(imports);
        }
        sections.extend(body);

        let mut out = sections.join("\n\n");
        out.push('\n');
        debug!(
            language = %self.emitter.language(),
            families = module.families.len(),
            bytes = out.len(),
            "rendered module"
        );
        out
    }

    fn new_context(&self) -> EmitContext {
        EmitContext::new(self.emitter.indent_style())
    }
}

/// Render `module` once per target. Repeated targets are rendered once.
pub fn generate(
    module: &ModuleIR,
    targets: &[Language],
    options: &EmitOptions,
) -> Result<GeneratedModules, CodegenError> {
    let mut output = GeneratedModules::new();
    let mut seen = Vec::with_capacity(targets.len());
    for &language in targets {
        if seen.contains(&language) {
            continue;
        }
        seen.push(language);
        let generator = CodeGenerator::new(language, options.clone())?;
        output.add_file(generator.file_name(), generator.render(module));
    }
    Ok(output)
}

/// Convert `schema` and render it. Nothing is rendered if conversion fails.
pub fn generate_from_schema(
    schema: &SchemaSpec,
    targets: &[Language],
    options: &EmitOptions,
) -> Result<GeneratedModules, CodegenError> {
    let module = convert_schema(schema)?;
    generate(&module, targets, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::test_support::module;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generated_modules_basics() {
        let mut out = GeneratedModules::new();
        out.add_file("units.ts", "export {};");
        out.add_file("units.go", "package units");
        assert_eq!(out.file_count(), 2);
        let paths: Vec<&String> = out.files().keys().collect();
        assert_eq!(paths, vec!["units.go", "units.ts"]);
        assert_eq!(out.get("units.go"), Some("package units"));
    }

    #[test]
    fn test_generated_modules_write_to_disk() {
        let mut out = GeneratedModules::new();
        out.add_file("units.go", "package units\n");
        out.add_file("ts/units.ts", "export {};\n");

        let dir = tempfile::tempdir().unwrap();
        let written = out.write_to_disk(dir.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(dir.path().join("ts/units.ts").exists());

        let content = std::fs::read_to_string(dir.path().join("units.go")).unwrap();
        assert_eq!(content, "package units\n");
    }

    #[test]
    fn test_options_validation() {
        assert!(EmitOptions::default().validate().is_ok());

        for pkg in ["", "Units", "9units", "type", "my-units"] {
            let options = EmitOptions {
                go_package: pkg.to_string(),
                ..EmitOptions::default()
            };
            assert!(
                matches!(options.validate(), Err(CodegenError::InvalidPackage(_))),
                "{pkg:?} should be rejected"
            );
        }

        for stem in ["", "../units", "a/b", ".hidden"] {
            let options = EmitOptions {
                file_stem: stem.to_string(),
                ..EmitOptions::default()
            };
            assert!(matches!(options.validate(), Err(CodegenError::InvalidStem(_))));
        }
    }

    #[test]
    fn test_file_names() {
        let options = EmitOptions {
            file_stem: "measures".to_string(),
            ..EmitOptions::default()
        };
        let go = CodeGenerator::new(Language::Go, options.clone()).unwrap();
        let ts = CodeGenerator::new(Language::Typescript, options).unwrap();
        assert_eq!(go.file_name(), "measures.go");
        assert_eq!(ts.file_name(), "measures.ts");
    }

    #[test]
    fn test_render_order() {
        let module = module();
        let go = CodeGenerator::new(Language::Go, EmitOptions::default()).unwrap();
        let code = go.render(&module);

        let position = |needle: &str| {
            code.find(needle)
                .unwrap_or_else(|| panic!("missing {needle:?} in generated Go"))
        };
        let order = [
            position("// Code generated by unitgen"),
            position("package units"),
            position("import ("),
            position("type Unit interface"),
            position("func Normalize("),
            position("func CompositeTitle("),
            position("func ResolveFamily("),
            position("func ResolveUnit("),
            position("func ResolveFamilyAndUnit("),
            position("func FamilyTitles("),
            position("func UnitsByFamily("),
            position("func CompositeTitles("),
            position("type Temperature struct{}"),
            position("type CelsiusTemperature struct {"),
            position("type FahrenheitTemperature struct {"),
            position("type Pressure struct{}"),
            position("type Number struct{}"),
            position("type _NumberNumber struct {"),
        ];
        assert!(order.windows(2).all(|w| w[0] < w[1]), "{order:?}");
        assert!(code.ends_with("}\n"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let module = module();
        for language in Language::ALL {
            let generator = CodeGenerator::new(language, EmitOptions::default()).unwrap();
            assert_eq!(generator.render(&module), generator.render(&module));
        }
    }

    #[test]
    fn test_generate_dedupes_targets() {
        let module = module();
        let out = generate(
            &module,
            &[Language::Typescript, Language::Go, Language::Typescript],
            &EmitOptions::default(),
        )
        .unwrap();
        assert_eq!(out.file_count(), 2);
        assert!(out.get("units.ts").unwrap().contains("export function resolveFamily("));
        assert!(out.get("units.go").unwrap().contains("func ResolveFamily("));
    }

    #[test]
    fn test_backends_share_tables() {
        let module = module();
        let out = generate(&module, &Language::ALL, &EmitOptions::default()).unwrap();
        let go = out.get("units.go").unwrap();
        let ts = out.get("units.ts").unwrap();
        for entry in &module.tables.unit_aliases {
            let var = &module.unit(entry.unit).var_ident;
            assert!(go.contains(&format!("{{\"{}\", {}}},", entry.key, var)));
            assert!(ts.contains(&format!("[\"{}\", {}],", entry.key, var)));
        }
    }

    #[test]
    fn test_generate_from_schema_stops_on_convert_error() {
        let schema = SchemaSpec {
            version: "1.0.0".to_string(),
            definitions: vec![],
        };
        let err = generate_from_schema(&schema, &Language::ALL, &EmitOptions::default())
            .unwrap_err();
        assert!(matches!(err, CodegenError::Convert(_)));
    }
}

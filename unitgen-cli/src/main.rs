use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use unitgen_codegen::EmitOptions;
use unitgen_ir::{ModuleIR, Resolved, Resolver};
use unitgen_spec::types::schema::FALLBACK_UNIT;
use unitgen_spec::{
    DocumentFormat, ErrorEntry, Language, LoadError, LoadedSchema, Severity, ValidationReport,
};

#[derive(Parser)]
#[command(name = "unitgen", about = "unitgen – unit conversion module generator")]
#[command(version, propagate_version = true)]
struct Cli {
    /// Log pipeline steps to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate Go and TypeScript modules from a unit schema
    Generate {
        /// Unit schema (.yaml, .yml or .json)
        schema: PathBuf,
        /// Output directory (defaults to outDir of unitgen.config.json, relative to the schema)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Target languages, comma-separated (defaults to the config's targets)
        #[arg(short, long, value_delimiter = ',', value_parser = parse_language)]
        targets: Vec<Language>,
        /// Go package name
        #[arg(long)]
        package: Option<String>,
        /// File name of the generated modules, without extension
        #[arg(long)]
        stem: Option<String>,
    },
    /// Validate a unit schema
    Validate {
        /// Unit schema (.yaml, .yml or .json)
        schema: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a unit schema and show summary info
    Check {
        /// Unit schema (.yaml, .yml or .json)
        schema: PathBuf,
        /// Print the resolved module model as JSON instead of the summary
        #[arg(long)]
        emit_ir: bool,
    },
    /// Show what a generated module resolves an input string to
    Resolve {
        /// Unit schema (.yaml, .yml or .json)
        schema: PathBuf,
        /// Composite title, family alias, or unit alias (with --family)
        input: String,
        /// Family alias to look the unit up in
        #[arg(short, long)]
        family: Option<String>,
    },
    /// Print the JSON Schema of the definitions document
    Schema {
        /// Print the schema of unitgen.config.json instead
        #[arg(long)]
        config: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Generate {
            schema,
            output,
            targets,
            package,
            stem,
        } => cmd_generate(
            &schema,
            output.as_deref(),
            &targets,
            package.as_deref(),
            stem.as_deref(),
        ),
        Command::Validate { schema, json } => cmd_validate(&schema, json),
        Command::Check { schema, emit_ir } => cmd_check(&schema, emit_ir),
        Command::Resolve {
            schema,
            input,
            family,
        } => cmd_resolve(&schema, &input, family.as_deref()),
        Command::Schema { config } => cmd_schema(config),
    };

    match result {
        Ok(success) => {
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_language(name: &str) -> Result<Language, String> {
    Language::from_name(name).ok_or_else(|| {
        let known: Vec<String> = Language::ALL.iter().map(ToString::to_string).collect();
        format!("unknown target '{name}' (expected one of: {})", known.join(", "))
    })
}

/// Load a schema. Documents that cannot be parsed or that break the document
/// structure are reported and yield `None`; anything else is an error.
fn load(path: &Path) -> Result<Option<LoadedSchema>> {
    match unitgen_spec::load_schema(path) {
        Ok(loaded) => Ok(Some(loaded)),
        Err(e @ (LoadError::ParseError(_) | LoadError::SchemaViolation(_))) => {
            let entries = e.entries();
            print_entries(&entries);
            println!();
            println!("{} {e}", "✗".red().bold());
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load schema '{}'", path.display())),
    }
}

fn print_entries(entries: &[ErrorEntry]) {
    for entry in entries {
        let severity_str = match entry.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };

        println!(
            "  {} [{}] {} ({}:{})",
            severity_str,
            entry.code.dimmed(),
            entry.message,
            entry.file.dimmed(),
            entry.path.dimmed(),
        );

        if let Some(suggestion) = &entry.suggestion {
            println!("    {} {}", "hint:".cyan(), suggestion);
        }
    }
}

fn display_path(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

fn cmd_generate(
    schema_path: &Path,
    output: Option<&Path>,
    targets: &[Language],
    package: Option<&str>,
    stem: Option<&str>,
) -> Result<bool> {
    println!("{} {}", "Generating units from".bold(), display_path(schema_path));

    // 1. Load & validate
    let Some(loaded) = load(schema_path)? else {
        return Ok(false);
    };
    let config = unitgen_spec::load_config(schema_path)
        .with_context(|| format!("Failed to load config for '{}'", schema_path.display()))?;

    let report = unitgen_valid::validate(&loaded);
    print_entries(&report.errors);
    let error_count = report.count(Severity::Error);
    if error_count > 0 {
        eprintln!(
            "{} {} validation error(s), fix them before generating code",
            "✗".red().bold(),
            error_count
        );
        return Ok(false);
    }

    // 2. Convert to IR
    let module = unitgen_ir::convert_schema(&loaded.schema)
        .with_context(|| "Failed to convert schema to IR")?;

    // 3. Render every target; flags override the config file
    let targets = if targets.is_empty() {
        config.targets.clone()
    } else {
        targets.to_vec()
    };
    let mut options = EmitOptions::from(&config);
    if let Some(package) = package {
        options.go_package = package.to_string();
    }
    if let Some(stem) = stem {
        options.file_stem = stem.to_string();
    }
    debug!(?targets, ?options, "resolved generator options");

    let generated = unitgen_codegen::generate(&module, &targets, &options)
        .with_context(|| "Generation failed")?;

    // 4. Write output
    let output_dir = match output {
        Some(d) => d.to_path_buf(),
        None => schema_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(&config.out_dir),
    };

    generated
        .write_to_disk(&output_dir)
        .with_context(|| format!("Failed to write to '{}'", output_dir.display()))?;
    info!(files = generated.file_count(), dir = %output_dir.display(), "generation complete");

    println!(
        "{} Generated {} file(s) → {}",
        "✓".green().bold(),
        generated.file_count(),
        output_dir.display()
    );

    for file_path in generated.files().keys() {
        println!("  {} {}", "→".dimmed(), file_path);
    }

    Ok(true)
}

fn cmd_validate(schema_path: &Path, json: bool) -> Result<bool> {
    if json {
        let report = match unitgen_spec::load_schema(schema_path) {
            Ok(loaded) => validate_with_config(&loaded)?,
            Err(e @ (LoadError::ParseError(_) | LoadError::SchemaViolation(_))) => {
                ValidationReport::from_errors(e.entries())
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to load schema '{}'", schema_path.display()))
            }
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report.ok);
    }

    println!("{} {}", "Validating".bold(), display_path(schema_path));

    let Some(loaded) = load(schema_path)? else {
        return Ok(false);
    };
    let report = validate_with_config(&loaded)?;
    print_entries(&report.errors);

    let error_count = report.count(Severity::Error);
    let warning_count = report.count(Severity::Warning);

    // Summary
    println!();
    if error_count == 0 && warning_count == 0 {
        println!(
            "{} Schema is valid ({} families, {} units)",
            "✓".green().bold(),
            loaded.schema.definitions.len(),
            loaded.schema.unit_count(),
        );
        Ok(true)
    } else if error_count == 0 {
        println!(
            "{} Valid with {} warning(s)",
            "⚠".yellow().bold(),
            warning_count,
        );
        Ok(true)
    } else {
        println!(
            "{} {} error(s), {} warning(s)",
            "✗".red().bold(),
            error_count,
            warning_count,
        );
        Ok(false)
    }
}

/// Schema rules plus a parse of the `unitgen.config.json` beside the schema.
fn validate_with_config(loaded: &LoadedSchema) -> Result<ValidationReport> {
    let mut report = unitgen_valid::validate(loaded);
    match unitgen_spec::load_config(&loaded.path) {
        Ok(_) => {}
        Err(e @ LoadError::ConfigParseError(_)) => {
            report.merge(ValidationReport::from_errors(e.entries()));
        }
        Err(e) => return Err(e).context("Failed to read generator config"),
    }
    Ok(report)
}

fn cmd_check(schema_path: &Path, emit_ir: bool) -> Result<bool> {
    let Some(loaded) = load(schema_path)? else {
        return Ok(false);
    };
    if emit_ir {
        return emit_module_ir(&loaded);
    }
    let schema = &loaded.schema;

    let format = match loaded.format {
        DocumentFormat::Yaml => "yaml",
        DocumentFormat::Json => "json",
    };
    println!("{}", "Schema Info".bold().underline());
    println!("  File:      {} ({format})", loaded.file);
    println!("  Version:   {}", schema.version);
    println!("  Families:  {}", schema.definitions.len());
    println!("  Units:     {}", schema.unit_count());
    let fallback = match schema.fallback_family() {
        Some((_, family)) if family.unit(FALLBACK_UNIT).is_some() => "present".green(),
        _ => "missing".red(),
    };
    println!("  Fallback:  {fallback}");

    // Try IR conversion
    println!();
    match unitgen_ir::convert_schema(schema) {
        Ok(module) => {
            println!("{}", "Families".bold().underline());
            for family in &module.families {
                println!(
                    "  {} {} (base {}, {} units)",
                    family.type_ident,
                    family.var_ident.dimmed(),
                    family.base_unit().type_ident,
                    family.units.len(),
                );
                for unit in &family.units {
                    println!("    {} {}", unit.type_ident, unit.var_ident.dimmed());
                }
            }

            println!();
            println!("{} IR conversion successful", "✓".green().bold());
        }
        Err(e) => {
            println!("{} IR conversion failed: {e}", "✗".red().bold());
        }
    }

    // Validation summary
    let report = unitgen_valid::validate(&loaded);
    let error_count = report.count(Severity::Error);

    if error_count > 0 {
        println!(
            "{} {} validation error(s) found",
            "✗".red().bold(),
            error_count
        );
        Ok(false)
    } else {
        println!("{} No validation errors", "✓".green().bold());
        Ok(true)
    }
}

/// Print the module every backend renders from, as JSON on stdout.
fn emit_module_ir(loaded: &LoadedSchema) -> Result<bool> {
    match unitgen_ir::convert_schema(&loaded.schema) {
        Ok(module) => {
            println!("{}", module_json(&module)?);
            Ok(true)
        }
        Err(e) => {
            eprintln!("{} IR conversion failed: {e}", "✗".red().bold());
            Ok(false)
        }
    }
}

fn module_json(module: &ModuleIR) -> Result<String> {
    serde_json::to_string_pretty(module).context("Failed to serialize module IR")
}

/// What a generated module answers for `input`. With a family, the unit
/// lookup within it; otherwise an exact composite title, then a family alias
/// (reported with the family's base unit).
fn resolve_input<'a>(resolver: &Resolver<'a>, input: &str, family: Option<&str>) -> Resolved<'a> {
    if let Some(family) = family {
        let family = resolver.resolve_family(family);
        return resolver.resolve_unit(input, family);
    }

    let composite = resolver.resolve_family_and_unit(input);
    if !composite.fallback {
        return composite;
    }

    let found = resolver.find_family(input);
    let family = found.unwrap_or_else(|| resolver.resolve_family(input));
    Resolved {
        family,
        unit: family.base_unit(),
        fallback: found.is_none(),
    }
}

fn cmd_resolve(schema_path: &Path, input: &str, family: Option<&str>) -> Result<bool> {
    let Some(loaded) = load(schema_path)? else {
        return Ok(false);
    };
    let module = unitgen_ir::convert_schema(&loaded.schema)
        .with_context(|| "Failed to convert schema to IR")?;
    let resolver = Resolver::new(&module);

    let resolved = resolve_input(&resolver, input, family);
    let note = if resolved.fallback {
        " (fallback)".yellow().to_string()
    } else {
        String::new()
    };

    println!("{} {input:?}{note}", "Resolved".bold());
    println!(
        "  Family:    {} {}",
        resolved.family.title,
        resolved.family.var_ident.dimmed()
    );
    println!(
        "  Unit:      {} {}",
        resolved.unit.title,
        resolved.unit.var_ident.dimmed()
    );
    println!(
        "  Composite: {}",
        Resolver::composite_title(resolved.family, resolved.unit)
    );

    Ok(true)
}

fn cmd_schema(config: bool) -> Result<bool> {
    let schema = if config {
        unitgen_spec::schema_def::generate_config_schema()
    } else {
        unitgen_spec::schema_def::generate_definitions_schema()
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(true)
}

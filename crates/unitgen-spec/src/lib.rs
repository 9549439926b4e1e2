pub mod loader;
pub mod parser;
pub mod schema_def;
pub mod types;

// Re-exports
pub use loader::{load_config, load_schema, LoadError, LoadedSchema};
pub use types::common::{DocumentFormat, Language, Severity};
pub use types::config::GeneratorConfig;
pub use types::error::{ErrorEntry, ValidationReport};
pub use types::schema::{FamilySpec, SchemaSpec, UnitSpec, FALLBACK_FAMILY, FALLBACK_UNIT};

pub mod context;
pub mod error;
pub mod generator;
pub mod statement;
pub mod traits;

// Language emitters
pub mod emitters;

// Re-exports
pub use context::{EmitContext, IndentStyle};
pub use error::CodegenError;
pub use generator::{generate, generate_from_schema, CodeGenerator, EmitOptions, GeneratedModules};
pub use statement::StatementIR;
pub use traits::LanguageEmitter;

pub mod conversion;
pub mod convert;
pub mod ident;
pub mod resolver;
pub mod types;

// Re-exports
pub use conversion::{ConversionIR, SpliceError};
pub use convert::{convert_schema, ConvertError};
pub use resolver::{Resolved, Resolver};
pub use types::{FamilyIR, LookupTables, ModuleIR, UnitIR, UnitRef};

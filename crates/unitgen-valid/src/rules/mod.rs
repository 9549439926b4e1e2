pub mod alias_portability;
pub mod base_unit;
pub mod conversion_syntax;
pub mod duplicate_alias;
pub mod fallback;
pub mod identifiers;
pub mod required_fields;
pub mod version_check;

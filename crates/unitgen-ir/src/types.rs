use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::conversion::ConversionIR;
use crate::ident;

/// Module-level IR: everything a backend needs to render one complete module.
///
/// Built once per run from the schema and never mutated afterwards; every
/// backend renders from the same instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleIR {
    /// Version string of the source document
    pub version: String,
    /// Families in declaration order
    pub families: Vec<FamilyIR>,
    /// The Number family/unit every resolver falls back to
    pub fallback: UnitRef,
    /// Resolver and descriptive tables, built in one pass over `families`
    pub tables: LookupTables,
}

/// Position of one unit: family index, then unit index within the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitRef {
    pub family: usize,
    pub unit: usize,
}

/// A family with every name resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyIR {
    /// Canonical type name as written in the schema
    pub name: String,
    /// Display title (e.g., "Temperature")
    pub title: String,
    /// Generated type name
    pub type_ident: String,
    /// Generated singleton variable name
    pub var_ident: String,
    /// Aliases as declared
    pub aliases: Vec<String>,
    /// Index of the base unit in `units`
    pub base: usize,
    /// Member units in declaration order
    pub units: Vec<UnitIR>,
}

/// A unit with every name resolved and both conversions spliced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitIR {
    /// Display name as written in the schema
    pub name: String,
    /// Display symbol
    pub symbol: String,
    /// Display title (e.g., "Fahrenheit")
    pub title: String,
    /// Generated type name
    pub type_ident: String,
    /// Generated singleton variable name
    pub var_ident: String,
    /// `fromBase` exactly as written, for generated documentation
    pub from_base_source: String,
    /// `toBase` exactly as written, for generated documentation
    pub to_base_source: String,
    /// Conversion from the family base into this unit
    pub from_base: ConversionIR,
    /// Conversion from this unit into the family base
    pub to_base: ConversionIR,
    /// Aliases as declared
    pub aliases: Vec<String>,
}

/// Tables behind the generated resolvers and introspection lists.
///
/// Duplicate keys keep their first occurrence only, so lookups over these
/// tables are first-declared-wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupTables {
    /// Normalized family alias → family, in declaration order
    pub family_aliases: Vec<FamilyAliasEntry>,
    /// `FamilyTitle->normalizedAlias` → unit, in declaration order
    pub unit_aliases: Vec<UnitAliasEntry>,
    /// `FamilyTitle_UnitTitle` → unit, for every unit in the schema
    pub composites: Vec<CompositeEntry>,
    /// Every family title
    pub family_titles: Vec<String>,
    /// Family title → ordered unit names
    pub units_by_family: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyAliasEntry {
    pub alias: String,
    pub family: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitAliasEntry {
    pub key: String,
    pub unit: UnitRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeEntry {
    pub title: String,
    pub unit: UnitRef,
}

impl ModuleIR {
    pub fn family(&self, index: usize) -> &FamilyIR {
        &self.families[index]
    }

    pub fn unit(&self, unit_ref: UnitRef) -> &UnitIR {
        &self.families[unit_ref.family].units[unit_ref.unit]
    }

    pub fn fallback_family(&self) -> &FamilyIR {
        self.family(self.fallback.family)
    }

    pub fn fallback_unit(&self) -> &UnitIR {
        self.unit(self.fallback)
    }

    /// Every unit with its owning family, in schema order.
    pub fn units(&self) -> impl Iterator<Item = (&FamilyIR, &UnitIR)> {
        self.families
            .iter()
            .flat_map(|f| f.units.iter().map(move |u| (f, u)))
    }
}

impl FamilyIR {
    pub fn base_unit(&self) -> &UnitIR {
        &self.units[self.base]
    }

    /// Unit names in declaration order.
    pub fn unit_names(&self) -> Vec<String> {
        self.units.iter().map(|u| u.name.clone()).collect()
    }

    /// Same answer as the generated family's `matches`.
    pub fn matches(&self, candidate: &str) -> bool {
        ident::matches_any(&self.aliases, candidate)
    }
}

impl UnitIR {
    /// Same answer as the generated unit's `matches`.
    pub fn matches(&self, candidate: &str) -> bool {
        ident::matches_any(&self.aliases, candidate)
    }
}

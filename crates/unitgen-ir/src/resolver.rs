use crate::ident::{self, UNIT_KEY_SEPARATOR, WILDCARD};
use crate::types::{FamilyIR, ModuleIR, UnitIR, UnitRef};

/// In-process mirror of the resolvers every generated module contains.
///
/// Lookups walk the same tables, in the same order, with the same fallback,
/// so the answer here is the answer a generated module gives at runtime.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    module: &'a ModuleIR,
}

/// A resolved (family, unit) pair.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub family: &'a FamilyIR,
    pub unit: &'a UnitIR,
    /// Whether nothing matched and the Number fallback was returned
    pub fallback: bool,
}

impl<'a> Resolver<'a> {
    pub fn new(module: &'a ModuleIR) -> Self {
        Self { module }
    }

    /// First family, in declaration order, with an alias matching `input`.
    /// Falls back to the Number family.
    pub fn resolve_family(&self, input: &str) -> &'a FamilyIR {
        self.find_family(input)
            .unwrap_or_else(|| self.module.fallback_family())
    }

    /// Like [`Self::resolve_family`], but `None` instead of the fallback.
    pub fn find_family(&self, input: &str) -> Option<&'a FamilyIR> {
        let normalized = ident::normalize(input);
        self.module
            .tables
            .family_aliases
            .iter()
            .find(|e| e.alias == normalized || (e.alias == WILDCARD && !normalized.is_empty()))
            .map(|e| self.module.family(e.family))
    }

    /// Unit of `family` whose alias matches `input`, looked up by the key
    /// `FamilyTitle->normalized(input)`. Falls back to the Number unit.
    pub fn resolve_unit(&self, input: &str, family: &FamilyIR) -> Resolved<'a> {
        let normalized = ident::normalize(input);
        let search = ident::unit_alias_key(&family.title, &normalized);
        let wildcard = format!("{}{UNIT_KEY_SEPARATOR}{WILDCARD}", family.title);

        let found = self.module.tables.unit_aliases.iter().find(|e| {
            e.key == search || (e.key == wildcard && !normalized.is_empty())
        });
        match found {
            Some(entry) => self.resolved(entry.unit, false),
            None => self.resolved(self.module.fallback, true),
        }
    }

    /// Exact, case-sensitive lookup of a composite title. The inverse of
    /// [`ident::composite_title`] for every pair in the module.
    pub fn resolve_family_and_unit(&self, composite_title: &str) -> Resolved<'a> {
        match self
            .module
            .tables
            .composites
            .iter()
            .find(|e| e.title == composite_title)
        {
            Some(entry) => self.resolved(entry.unit, false),
            None => self.resolved(self.module.fallback, true),
        }
    }

    /// Composite title of a unit of a family.
    pub fn composite_title(family: &FamilyIR, unit: &UnitIR) -> String {
        ident::composite_title(&family.title, &unit.title)
    }

    fn resolved(&self, unit_ref: UnitRef, fallback: bool) -> Resolved<'a> {
        Resolved {
            family: self.module.family(unit_ref.family),
            unit: self.module.unit(unit_ref),
            fallback,
        }
    }
}

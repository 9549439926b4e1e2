use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::debug;

use unitgen_spec::types::schema::{
    FamilySpec, SchemaSpec, UnitSpec, FALLBACK_FAMILY, FALLBACK_UNIT,
};

use crate::conversion::{ConversionIR, SpliceError};
use crate::ident;
use crate::types::{
    CompositeEntry, FamilyAliasEntry, FamilyIR, LookupTables, ModuleIR, UnitAliasEntry, UnitIR,
    UnitRef,
};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("base unit '{base_unit}' of family '{family}' is not one of its units")]
    MissingBaseUnit { family: String, base_unit: String },

    #[error("base unit '{base_unit}' of family '{family}' matches {count} units")]
    AmbiguousBaseUnit {
        family: String,
        base_unit: String,
        count: usize,
    },

    #[error("malformed {field} of unit '{unit}' in family '{family}': {source}")]
    MalformedConversion {
        family: String,
        unit: String,
        field: &'static str,
        #[source]
        source: SpliceError,
    },

    #[error("identifier '{identifier}' is generated for both {first} and {second}")]
    IdentifierCollision {
        identifier: String,
        first: String,
        second: String,
    },

    #[error("fallback family 'Number' with unit 'Number' is missing")]
    MissingFallback,
}

/// Convert a parsed schema into the module IR shared by every backend.
///
/// Fails on the first integrity violation; nothing is rendered from a schema
/// that does not convert.
pub fn convert_schema(schema: &SchemaSpec) -> Result<ModuleIR, ConvertError> {
    let families = schema
        .definitions
        .iter()
        .map(convert_family)
        .collect::<Result<Vec<_>, _>>()?;

    let fallback = find_fallback(&families)?;
    check_collisions(&families)?;
    let tables = build_tables(&families);

    debug!(
        families = families.len(),
        family_aliases = tables.family_aliases.len(),
        unit_aliases = tables.unit_aliases.len(),
        composites = tables.composites.len(),
        "converted schema to module IR"
    );

    Ok(ModuleIR {
        version: schema.version.clone(),
        families,
        fallback,
        tables,
    })
}

fn convert_family(family: &FamilySpec) -> Result<FamilyIR, ConvertError> {
    let count = family.base_candidates();
    if count > 1 {
        return Err(ConvertError::AmbiguousBaseUnit {
            family: family.kind.clone(),
            base_unit: family.base_unit.clone(),
            count,
        });
    }
    let (base, _) = family.base().ok_or_else(|| ConvertError::MissingBaseUnit {
        family: family.kind.clone(),
        base_unit: family.base_unit.clone(),
    })?;

    let title = ident::title(&family.kind);
    let units = family
        .units
        .iter()
        .map(|unit| convert_unit(unit, family, &title))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FamilyIR {
        name: family.kind.clone(),
        type_ident: ident::family_type_ident(&title),
        var_ident: ident::family_var_ident(&title),
        title,
        aliases: family.matches.clone(),
        base,
        units,
    })
}

fn convert_unit(
    unit: &UnitSpec,
    family: &FamilySpec,
    family_title: &str,
) -> Result<UnitIR, ConvertError> {
    let splice = |field: &'static str, source: &str| {
        ConversionIR::parse(source).map_err(|source| ConvertError::MalformedConversion {
            family: family.kind.clone(),
            unit: unit.name.clone(),
            field,
            source,
        })
    };

    let title = ident::title(&unit.name);
    Ok(UnitIR {
        name: unit.name.clone(),
        symbol: unit.symbol.clone(),
        type_ident: ident::unit_type_ident(&title, family_title),
        var_ident: ident::unit_var_ident(&title, family_title),
        title,
        from_base_source: unit.from_base.clone(),
        to_base_source: unit.to_base.clone(),
        from_base: splice("fromBase", &unit.from_base)?,
        to_base: splice("toBase", &unit.to_base)?,
        aliases: unit.matches.clone(),
    })
}

fn find_fallback(families: &[FamilyIR]) -> Result<UnitRef, ConvertError> {
    families
        .iter()
        .enumerate()
        .filter(|(_, f)| f.name == FALLBACK_FAMILY)
        .find_map(|(fi, f)| {
            f.units
                .iter()
                .position(|u| u.name == FALLBACK_UNIT)
                .map(|ui| UnitRef { family: fi, unit: ui })
        })
        .ok_or(ConvertError::MissingFallback)
}

/// Every generated name must be unique across the whole module, including the
/// names the preamble declares and the composite-title keys.
fn check_collisions(families: &[FamilyIR]) -> Result<(), ConvertError> {
    let mut owners: HashMap<String, String> = ident::PREAMBLE_NAMES
        .iter()
        .map(|name| (name.to_string(), "the module preamble".to_string()))
        .collect();

    let mut claim = |identifier: &str, owner: String| match owners.get(identifier) {
        Some(first) => Err(ConvertError::IdentifierCollision {
            identifier: identifier.to_string(),
            first: first.clone(),
            second: owner,
        }),
        None => {
            owners.insert(identifier.to_string(), owner);
            Ok(())
        }
    };

    for family in families {
        let owner = format!("family '{}'", family.name);
        claim(&family.type_ident, owner.clone())?;
        claim(&family.var_ident, owner)?;
        for unit in &family.units {
            let owner = format!("unit '{}' of family '{}'", unit.name, family.name);
            claim(&unit.type_ident, owner.clone())?;
            claim(&unit.var_ident, owner)?;
        }
    }

    let mut composites: HashMap<String, String> = HashMap::new();
    for family in families {
        for unit in &family.units {
            let key = ident::composite_title(&family.title, &unit.title);
            let owner = format!("unit '{}' of family '{}'", unit.name, family.name);
            if let Some(first) = composites.get(&key) {
                return Err(ConvertError::IdentifierCollision {
                    identifier: key,
                    first: first.clone(),
                    second: owner,
                });
            }
            composites.insert(key, owner);
        }
    }

    Ok(())
}

fn build_tables(families: &[FamilyIR]) -> LookupTables {
    let mut tables = LookupTables::default();
    let mut seen_family_aliases = HashSet::new();
    let mut seen_unit_keys = HashSet::new();

    for (fi, family) in families.iter().enumerate() {
        tables.family_titles.push(family.title.clone());
        tables
            .units_by_family
            .insert(family.title.clone(), family.unit_names());

        for alias in &family.aliases {
            let alias = ident::table_alias(alias);
            if seen_family_aliases.insert(alias.clone()) {
                tables.family_aliases.push(FamilyAliasEntry { alias, family: fi });
            }
        }

        for (ui, unit) in family.units.iter().enumerate() {
            let unit_ref = UnitRef { family: fi, unit: ui };
            for alias in &unit.aliases {
                let key = ident::unit_alias_key(&family.title, &ident::table_alias(alias));
                if seen_unit_keys.insert(key.clone()) {
                    tables.unit_aliases.push(UnitAliasEntry { key, unit: unit_ref });
                }
            }
            tables.composites.push(CompositeEntry {
                title: ident::composite_title(&family.title, &unit.title),
                unit: unit_ref,
            });
        }
    }

    tables
}

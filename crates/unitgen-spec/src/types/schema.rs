use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of the family every resolver falls back to.
pub const FALLBACK_FAMILY: &str = "Number";
/// Name of the unit inside the fallback family that resolvers fall back to.
pub const FALLBACK_UNIT: &str = "Number";

/// Definitions document (units.yaml / units.json)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SchemaSpec {
    /// Document format version (e.g., "1.0.0")
    pub version: String,

    /// Unit families, in declaration order. Order is significant:
    /// the first declared family wins when aliases overlap.
    pub definitions: Vec<FamilySpec>,
}

/// A family of mutually convertible units (a "unit type")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FamilySpec {
    /// Canonical type name (e.g., "Pressure")
    #[serde(rename = "type")]
    pub kind: String,

    /// Name of the member unit every other unit converts through
    pub base_unit: String,

    /// Free-text identifiers for the family itself
    #[serde(default)]
    pub matches: Vec<String>,

    /// Member units, in declaration order
    #[serde(default)]
    pub units: Vec<UnitSpec>,
}

/// One convertible unit within a family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UnitSpec {
    /// Display name (e.g., "Fahrenheit")
    pub name: String,

    /// Short display token (e.g., "°F")
    #[serde(default)]
    pub symbol: String,

    /// Conversion from the family base, written as `<param> => <formula>`
    pub from_base: String,

    /// Conversion to the family base, written as `<param> => <formula>`
    pub to_base: String,

    /// Case-insensitive free-text identifiers; `*` matches anything
    #[serde(default)]
    pub matches: Vec<String>,
}

impl SchemaSpec {
    /// The designated fallback family, with its declaration index.
    pub fn fallback_family(&self) -> Option<(usize, &FamilySpec)> {
        self.definitions
            .iter()
            .enumerate()
            .find(|(_, f)| f.kind == FALLBACK_FAMILY)
    }

    /// Total number of units across every family.
    pub fn unit_count(&self) -> usize {
        self.definitions.iter().map(|f| f.units.len()).sum()
    }
}

impl FamilySpec {
    /// The unit whose name equals `base_unit`, if any.
    pub fn base(&self) -> Option<(usize, &UnitSpec)> {
        self.units
            .iter()
            .enumerate()
            .find(|(_, u)| u.name == self.base_unit)
    }

    /// How many units carry the base unit's name. Exactly one is valid.
    pub fn base_candidates(&self) -> usize {
        self.units.iter().filter(|u| u.name == self.base_unit).count()
    }

    /// Look up a member unit by exact name.
    pub fn unit(&self, name: &str) -> Option<&UnitSpec> {
        self.units.iter().find(|u| u.name == name)
    }
}

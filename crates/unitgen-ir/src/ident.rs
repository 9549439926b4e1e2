//! Identifier synthesis.
//!
//! Every backend derives its type names, variable names and lookup keys from
//! these functions, so cross references between family and unit code agree in
//! every generated language.

/// Prefix applied to a unit identifier whose title equals its family's title.
pub const COLLISION_MARKER: &str = "_";

/// Suffix of a unit's singleton variable.
pub const UNIT_VAR_SUFFIX: &str = "Unit";

/// Suffix of a family's singleton variable.
pub const FAMILY_VAR_SUFFIX: &str = "UnitType";

/// Separator between family title and unit title in a composite title.
pub const COMPOSITE_SEPARATOR: &str = "_";

/// Separator between family title and normalized alias in unit lookup keys.
pub const UNIT_KEY_SEPARATOR: &str = "->";

/// Alias that matches any non-empty input.
pub const WILDCARD: &str = "*";

/// Names declared by the module preambles. No schema entity may take one.
pub const PREAMBLE_NAMES: &[&str] = &[
    "Unit",
    "UnitType",
    "Normalize",
    "CompositeTitle",
    "ResolveFamily",
    "ResolveUnit",
    "ResolveFamilyAndUnit",
    "FamilyTitles",
    "UnitsByFamily",
    "CompositeTitles",
    "ResolverTables",
];

/// Human-readable title: hyphens become spaces, each whitespace-separated
/// component gets an upper-cased first letter, components are joined with no
/// separator.
///
/// `"pounds-per square-inch"` → `"PoundsPerSquareInch"`
pub fn title(name: &str) -> String {
    name.replace('-', " ")
        .split_whitespace()
        .map(|component| {
            let mut chars = component.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Source-safe identifier for a title: anything outside `[A-Za-z0-9_]` is
/// dropped, and a leading digit (or an empty result) gets a `_` prefix.
pub fn identifier(title: &str) -> String {
    let ident: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    match ident.chars().next() {
        Some(c) if !c.is_ascii_digit() => ident,
        _ => format!("_{ident}"),
    }
}

/// Letters and digits of `name` that [`identifier`] would silently drop.
pub fn dropped_chars(name: &str) -> Vec<char> {
    name.chars()
        .filter(|c| c.is_alphanumeric() && !c.is_ascii())
        .collect()
}

/// Type identifier of a family.
pub fn family_type_ident(family_title: &str) -> String {
    identifier(family_title)
}

/// Variable identifier of a family's singleton.
pub fn family_var_ident(family_title: &str) -> String {
    format!("{}{FAMILY_VAR_SUFFIX}", family_type_ident(family_title))
}

/// Type identifier of a unit: unit identifier followed by the family
/// identifier. A unit titled like its family gets the collision marker so the
/// two type names can never coincide.
pub fn unit_type_ident(unit_title: &str, family_title: &str) -> String {
    let marker = if unit_title == family_title {
        COLLISION_MARKER
    } else {
        ""
    };
    format!(
        "{marker}{}{}",
        identifier(unit_title),
        family_type_ident(family_title)
    )
}

/// Variable identifier of a unit's singleton.
pub fn unit_var_ident(unit_title: &str, family_title: &str) -> String {
    format!("{}{UNIT_VAR_SUFFIX}", unit_type_ident(unit_title, family_title))
}

/// Canonical key of one exact (family, unit) pair.
pub fn composite_title(family_title: &str, unit_title: &str) -> String {
    format!("{family_title}{COMPOSITE_SEPARATOR}{unit_title}")
}

/// Lookup key of a unit alias within a family.
pub fn unit_alias_key(family_title: &str, normalized_alias: &str) -> String {
    format!("{family_title}{UNIT_KEY_SEPARATOR}{normalized_alias}")
}

/// Case-fold and strip all whitespace. Every `matches` predicate and resolver
/// compares normalized strings.
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Form an alias takes in the lookup tables and in duplicate detection.
/// Every spelling of the wildcard (`" * "`, `"*\t"`) becomes `*`.
pub fn table_alias(alias: &str) -> String {
    normalize(alias)
}

/// Characters of `alias` that the generated targets may normalize
/// differently: non-ASCII cased letters (full vs. simple case mapping,
/// context-sensitive final sigma) and non-ASCII whitespace, including the
/// byte-order mark that only some targets strip.
pub fn unportable_chars(alias: &str) -> Vec<char> {
    alias
        .chars()
        .filter(|c| {
            !c.is_ascii()
                && (c.is_uppercase() || c.is_lowercase() || c.is_whitespace() || *c == '\u{feff}')
        })
        .collect()
}

/// Whether `candidate` matches any alias in `aliases`, with the wildcard
/// accepting any non-empty candidate.
pub fn matches_any<S: AsRef<str>>(aliases: &[S], candidate: &str) -> bool {
    let candidate = normalize(candidate);
    aliases.iter().any(|alias| {
        let alias = table_alias(alias.as_ref());
        (alias == WILDCARD && !candidate.is_empty()) || alias == candidate
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_title() {
        assert_eq!(title("Fahrenheit"), "Fahrenheit");
        assert_eq!(title("pounds per square inch"), "PoundsPerSquareInch");
        assert_eq!(title("nautical-mile"), "NauticalMile");
        assert_eq!(title("  kilo   meter "), "KiloMeter");
        assert_eq!(title("miles/hour"), "Miles/hour");
        assert_eq!(title(""), "");
    }

    #[test]
    fn test_identifier_strips_unsafe_characters() {
        assert_eq!(identifier("Miles/hour"), "Mileshour");
        assert_eq!(identifier("Degree(°)"), "Degree");
        assert_eq!(identifier("3D"), "_3D");
        assert_eq!(identifier("°"), "_");
    }

    #[test]
    fn test_dropped_chars() {
        assert_eq!(dropped_chars("Ångström"), vec!['Å', 'ö']);
        assert_eq!(dropped_chars("Miles/hour"), Vec::<char>::new());
        assert_eq!(dropped_chars("Degree(°)"), Vec::<char>::new());
    }

    #[test]
    fn test_unportable_chars() {
        assert_eq!(unportable_chars("°c"), Vec::<char>::new());
        assert_eq!(unportable_chars("İnch"), vec!['İ']);
        assert_eq!(unportable_chars("µm"), vec!['µ']);
        assert_eq!(unportable_chars("kilo\u{a0}meter"), vec!['\u{a0}']);
        assert_eq!(unportable_chars("\u{feff}m"), vec!['\u{feff}']);
    }

    #[test]
    fn test_unit_type_ident() {
        assert_eq!(unit_type_ident("Fahrenheit", "Temperature"), "FahrenheitTemperature");
        assert_eq!(unit_type_ident("Pressure", "Pressure"), "_PressurePressure");
        assert_eq!(unit_var_ident("Pressure", "Pressure"), "_PressurePressureUnit");
        assert_eq!(family_var_ident("Pressure"), "PressureUnitType");
        assert_ne!(unit_type_ident("Number", "Number"), family_type_ident("Number"));
    }

    #[test]
    fn test_composite_title() {
        assert_eq!(composite_title("Temperature", "Fahrenheit"), "Temperature_Fahrenheit");
        assert_eq!(unit_alias_key("Temperature", "f"), "Temperature->f");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(" M e t e r s "), "meters");
        assert_eq!(normalize("Meters\t"), "meters");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_matches_any() {
        let aliases = ["meters", "M"];
        assert!(matches_any(&aliases, "Meters"));
        assert!(matches_any(&aliases, " m "));
        assert!(!matches_any(&aliases, "feet"));

        let wildcard = ["*"];
        assert!(matches_any(&wildcard, "anything at all"));
        assert!(!matches_any(&wildcard, "   "));
    }

    #[test]
    fn test_spaced_wildcard_is_a_wildcard() {
        assert_eq!(table_alias(" * "), WILDCARD);
        assert_eq!(table_alias("*\t"), WILDCARD);
        assert_ne!(table_alias("**"), WILDCARD);
        assert!(matches_any(&[" * "], "volume"));
        assert!(!matches_any(&[" * "], ""));
    }
}

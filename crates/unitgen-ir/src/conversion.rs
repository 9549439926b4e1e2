use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The arrow separating parameter and formula in `<param> => <formula>`.
pub const ARROW: &str = "=>";

/// Characters trimmed from both sides of each component, besides whitespace.
const SEPARATORS: &[char] = &[',', ';'];

/// A spliced conversion expression: one parameter and an opaque formula body.
///
/// The body is never interpreted; it is copied verbatim into every backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionIR {
    /// Input variable name
    pub param: String,
    /// Numeric expression over `param`, in the syntax shared by the targets
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected `<param> => <formula>`, found {components} component(s) in {source_text:?}")]
pub struct SpliceError {
    pub components: usize,
    pub source_text: String,
}

impl ConversionIR {
    /// Split `<param> => <formula>` into its two components.
    pub fn parse(source: &str) -> Result<Self, SpliceError> {
        let components: Vec<&str> = source.split(ARROW).map(trim_component).collect();

        match components.as_slice() {
            [param, body] if !param.is_empty() && !body.is_empty() => Ok(Self {
                param: (*param).to_string(),
                body: (*body).to_string(),
            }),
            _ => Err(SpliceError {
                components: components.iter().filter(|c| !c.is_empty()).count(),
                source_text: source.to_string(),
            }),
        }
    }

    /// Whether the formula references the parameter as a whole identifier.
    pub fn mentions_param(&self) -> bool {
        identifier_spans(&self.body).any(|(start, end)| self.body[start..end] == self.param)
    }

    /// This conversion with its parameter renamed when it is a reserved word of
    /// the target language. The new name is `<param>_`, applied to the
    /// declaration and to every whole-identifier occurrence in the body.
    pub fn for_target(&self, reserved: &[&str]) -> ConversionIR {
        if !reserved.contains(&self.param.as_str()) {
            return self.clone();
        }
        let renamed = format!("{}_", self.param);
        ConversionIR {
            body: self.rename_in_body(&renamed),
            param: renamed,
        }
    }

    fn rename_in_body(&self, renamed: &str) -> String {
        let mut out = String::with_capacity(self.body.len() + 8);
        let mut last = 0;
        for (start, end) in identifier_spans(&self.body) {
            if self.body[start..end] == self.param {
                out.push_str(&self.body[last..start]);
                out.push_str(renamed);
                last = end;
            }
        }
        out.push_str(&self.body[last..]);
        out
    }
}

fn trim_component(component: &str) -> &str {
    component.trim_matches(|c: char| c.is_whitespace() || SEPARATORS.contains(&c))
}

fn identifier_regex() -> &'static Regex {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    IDENT.get_or_init(|| Regex::new(r"[A-Za-z_$][A-Za-z0-9_$]*").expect("valid regex"))
}

/// Byte spans of free-standing identifiers in `text`: not a member access
/// (`Math.PI`) and not the exponent part of a number literal (`1e5`).
fn identifier_spans(text: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    identifier_regex().find_iter(text).filter_map(move |m| {
        let preceded_by = text[..m.start()].chars().next_back();
        match preceded_by {
            Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.' => None,
            _ => Some((m.start(), m.end())),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple() {
        let conv = ConversionIR::parse("f => (f-32)*5/9").unwrap();
        assert_eq!(conv.param, "f");
        assert_eq!(conv.body, "(f-32)*5/9");
    }

    #[test]
    fn test_parse_trims_whitespace_and_separators() {
        let conv = ConversionIR::parse("  x=>x * 1000, ").unwrap();
        assert_eq!(conv.param, "x");
        assert_eq!(conv.body, "x * 1000");
    }

    #[test]
    fn test_parse_keeps_inner_commas() {
        let conv = ConversionIR::parse("x => Math.pow(x, 2)").unwrap();
        assert_eq!(conv.body, "Math.pow(x, 2)");
    }

    #[test]
    fn test_parse_rejects_missing_arrow() {
        let err = ConversionIR::parse("x * 1000").unwrap_err();
        assert_eq!(err.components, 1);
    }

    #[test]
    fn test_parse_rejects_extra_arrow() {
        let err = ConversionIR::parse("x => y => x").unwrap_err();
        assert_eq!(err.components, 3);
    }

    #[test]
    fn test_parse_rejects_empty_side() {
        assert!(ConversionIR::parse("=> x").is_err());
        assert!(ConversionIR::parse("x =>").is_err());
    }

    #[test]
    fn test_mentions_param() {
        assert!(ConversionIR::parse("x => x*2").unwrap().mentions_param());
        assert!(!ConversionIR::parse("x => 42").unwrap().mentions_param());
        assert!(!ConversionIR::parse("e => 1e5").unwrap().mentions_param());
        assert!(!ConversionIR::parse("PI => Math.PI").unwrap().mentions_param());
    }

    #[test]
    fn test_for_target_renames_reserved_param() {
        let conv = ConversionIR::parse("in => in * 2.54 + Math.max(in, 0)").unwrap();
        let safe = conv.for_target(&["in", "type"]);
        assert_eq!(safe.param, "in_");
        assert_eq!(safe.body, "in_ * 2.54 + Math.max(in_, 0)");
    }

    #[test]
    fn test_for_target_leaves_longer_identifiers() {
        let conv = ConversionIR::parse("in => inches + in + obj.in").unwrap();
        let safe = conv.for_target(&["in"]);
        assert_eq!(safe.body, "inches + in_ + obj.in");
    }

    #[test]
    fn test_for_target_passthrough() {
        let conv = ConversionIR::parse("x => x / 1000").unwrap();
        assert_eq!(conv.for_target(&["in"]), conv);
    }
}

use crate::Result;
use crate::error::Error;
use crate::tree::Path;

use regex::Regex;
use std::sync::LazyLock;

/// Overlay operator between terms, with any surrounding whitespace.
const OVERLAY_SEP_RE: &str = r"\s*\*\s*";

static OVERLAY_SEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(OVERLAY_SEP_RE).expect("overlay separator regex is valid"));

/// Parse a reference expression into its ordered list of paths.
///
/// Expected form: dotted paths joined by `*`
///
/// Example:
/// "Example.Path1 * Example.Path2"  =>  [Example.Path1, Example.Path2]
///
/// Blank input yields no paths.
pub fn parse_specification(input: &str) -> Result<Vec<Path>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for (i, term) in OVERLAY_SEP.split(trimmed).enumerate() {
        if term.is_empty() {
            return Err(invalid(input, format!("term {} is empty", i + 1)));
        }
        let path: Path = term
            .parse()
            .map_err(|e: Error| invalid(input, format!("term {} ({:?}): {}", i + 1, term, e)))?;
        out.push(path);
    }
    Ok(out)
}

fn invalid(input: &str, reason: String) -> Error {
    Error::InvalidReference {
        input: input.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(spec: &[Path]) -> Vec<String> {
        spec.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn splits_on_overlay_operator() {
        let spec = parse_specification("Example.Path1 * Example.Path2").unwrap();
        assert_eq!(names(&spec), ["Example.Path1", "Example.Path2"]);

        let tight = parse_specification("A*B.C*D").unwrap();
        assert_eq!(names(&tight), ["A", "B.C", "D"]);
    }

    #[test]
    fn blank_input_is_empty() {
        assert!(parse_specification("").unwrap().is_empty());
        assert!(parse_specification("   ").unwrap().is_empty());
    }

    #[test]
    fn empty_terms_are_errors() {
        let err = parse_specification("A.B * ").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidReference {
                input: "A.B * ".to_string(),
                reason: "term 2 is empty".to_string(),
            }
        );
        assert!(parse_specification("* A").is_err());
        assert!(parse_specification("A.B.").is_err());
        assert!(parse_specification("A.3x").is_err());
    }
}

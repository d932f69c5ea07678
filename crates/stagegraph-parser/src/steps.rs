//! Step extraction from the body of a `steps { ... }` block.

use std::sync::LazyLock;

use log::trace;
use regex::Regex;

/// Commands recognized as steps.
pub const STEP_VERBS: [&str; 3] = ["sh", "echo", "bat"];

/// Pattern matching one recognized step and capturing its quoted argument.
///
/// Parentheses around the argument are optional and either quote style is
/// accepted. The argument is the shortest non-empty run up to the next
/// quote on the same line.
pub const STEP_PATTERN: &str = r#"(?:sh|echo|bat)\s*\(?\s*['"](.+?)['"]\s*\)?"#;

static STEP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(STEP_PATTERN).expect("step pattern is valid"));

/// Extracts the quoted arguments of every recognized step in `text`.
///
/// Arguments are returned in source order; which verb introduced them is
/// discarded. Calls to any other command are ignored.
///
/// # Examples
///
/// ```
/// # use stagegraph_parser::extract_steps;
/// let steps = extract_steps("echo 'A'\nrun('B')\nsh(\"make all\")");
/// assert_eq!(steps, ["A", "make all"]);
/// ```
pub fn extract_steps(text: &str) -> Vec<String> {
    STEP_REGEX
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .map(|argument| {
            trace!(step = argument.as_str(); "Found step");
            argument.as_str().to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbs_match_pattern() {
        let regex = Regex::new(STEP_PATTERN).unwrap();
        for verb in STEP_VERBS {
            let call = format!("{verb} 'x'");
            assert!(regex.is_match(&call), "{verb} should be recognized");
        }
    }

    #[test]
    fn test_unrecognized_verb_is_skipped() {
        assert_eq!(extract_steps("echo 'A'\nrun('B')"), ["A"]);
    }

    #[test]
    fn test_all_call_styles() {
        let text = r#"
            sh 'make'
            sh('make test')
            bat "build.cmd"
            echo("done")
            echo ( 'spaced' )
        "#;
        assert_eq!(
            extract_steps(text),
            ["make", "make test", "build.cmd", "done", "spaced"]
        );
    }

    #[test]
    fn test_source_order_is_kept() {
        assert_eq!(extract_steps("bat 'b' sh 'a' echo 'c'"), ["b", "a", "c"]);
    }

    #[test]
    fn test_no_steps() {
        assert!(extract_steps("").is_empty());
        assert!(extract_steps("timeout(time: 5) { retry(3) }").is_empty());
    }

    #[test]
    fn test_empty_argument_is_not_a_step() {
        // `.+?` needs at least one character, so the match runs on to the
        // next quote pair.
        assert_eq!(extract_steps("sh ''x'"), ["'x"]);
    }

    #[test]
    fn test_argument_stops_at_first_quote_of_either_kind() {
        assert_eq!(extract_steps(r#"echo "it's fine""#), ["it"]);
    }

    #[test]
    fn test_argument_does_not_span_lines() {
        assert!(extract_steps("sh '\n'").is_empty());
    }
}

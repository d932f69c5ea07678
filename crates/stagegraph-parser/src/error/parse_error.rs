//! Failure of a strict parse.

use std::fmt;

use crate::error::Diagnostic;

/// Everything a strict parse had to skip.
///
/// Holds at least one diagnostic, in the order the scan met them. All of
/// them have been promoted to errors.
#[derive(Debug)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    pub(crate) fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// The skipped stages and blocks, in source order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((first, rest)) = self.diagnostics.split_first() else {
            return f.write_str("pipeline could not be parsed");
        };

        write!(f, "{first}")?;
        match rest.len() {
            0 => Ok(()),
            1 => f.write_str(" and 1 more problem"),
            n => write!(f, " and {n} more problems"),
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParseConfig, parse};

    fn strict_failure(source: &str) -> ParseError {
        parse(source, &ParseConfig::new(8, true)).unwrap_err()
    }

    #[test]
    fn test_missing_pipeline() {
        let err = strict_failure("node { }");

        assert_eq!(err.diagnostics().len(), 1);
        assert!(err.to_string().starts_with("error[E001]: "));
        assert!(!err.to_string().contains("more problem"));
    }

    #[test]
    fn test_counts_remaining_problems() {
        let err = strict_failure(
            "pipeline { stage('A') { agent any } stage('B') { agent any } stage('C') { agent any } }",
        );

        assert_eq!(err.diagnostics().len(), 3);
        assert_eq!(
            err.to_string(),
            "error[E101]: stage `A` has no steps block and 2 more problems"
        );
    }

    #[test]
    fn test_single_extra_problem() {
        let err = strict_failure("pipeline { stage('A') { } stage('B') { } }");

        assert!(err.to_string().ends_with("and 1 more problem"));
    }
}

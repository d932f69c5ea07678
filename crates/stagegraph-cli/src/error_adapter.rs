//! Rendering of pipeline problems through miette.
//!
//! Parser diagnostics carry spans into the Jenkinsfile, so they are shown
//! with a source snippet. Everything else (a missing input file, a bad
//! config, an export failure) is shown as a plain message with a code.
//!
//! A strict parse can fail on several stages at once. Each one becomes its
//! own [`Reportable`] so the user sees every skipped stage, not just the
//! first.

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, LabeledSpan, Severity as MietteSeverity, SourceSpan,
};

use stagegraph::StagegraphError;
use stagegraph_parser::error::{Diagnostic, Severity};

/// One problem, ready for [`miette::GraphicalReportHandler`].
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A skipped stage or block, with the Jenkinsfile it was found in.
    Pipeline {
        diagnostic: &'a Diagnostic,
        source: &'a str,
    },
    /// Any failure outside the Jenkinsfile itself.
    Run(&'a StagegraphError),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Pipeline { diagnostic, .. } => f.write_str(diagnostic.message()),
            Reportable::Run(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Pipeline { .. } => None,
            Reportable::Run(err) => err.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Pipeline { diagnostic, .. } => diagnostic
                .code()
                .map(|code| Box::new(code) as Box<dyn fmt::Display>),
            Reportable::Run(err) => {
                run_code(err).map(|code| Box::new(code) as Box<dyn fmt::Display>)
            }
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        let Reportable::Pipeline { diagnostic, .. } = self else {
            return Some(MietteSeverity::Error);
        };
        Some(match diagnostic.severity() {
            Severity::Error => MietteSeverity::Error,
            Severity::Warning => MietteSeverity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self {
            Reportable::Pipeline { diagnostic, .. } => diagnostic.help()?,
            Reportable::Run(StagegraphError::Config(_)) => {
                "check the file passed with --config or stagegraph/config.toml"
            }
            Reportable::Run(_) => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Pipeline { source, .. } => Some(source as &dyn miette::SourceCode),
            Reportable::Run(_) => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let Reportable::Pipeline { diagnostic, .. } = self else {
            return None;
        };
        if diagnostic.labels().is_empty() {
            return None;
        }

        Some(Box::new(diagnostic.labels().iter().map(|label| {
            let span = SourceSpan::new(label.span().start().into(), label.span().len());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

fn run_code(err: &StagegraphError) -> Option<&'static str> {
    match err {
        StagegraphError::Io(_) => Some("stagegraph::io"),
        StagegraphError::Config(_) => Some("stagegraph::config"),
        StagegraphError::Export(_) => Some("stagegraph::export"),
        StagegraphError::Parse { .. } => None,
    }
}

/// Splits a failed run into the problems to show.
///
/// A strict parse failure yields one entry per skipped stage or block.
pub fn to_reportables(err: &StagegraphError) -> Vec<Reportable<'_>> {
    match err {
        StagegraphError::Parse { err, src } => warning_reportables(err.diagnostics(), src),
        _ => vec![Reportable::Run(err)],
    }
}

/// Wraps the warnings of a lenient parse for rendering.
pub fn warning_reportables<'a>(
    diagnostics: &'a [Diagnostic],
    source: &'a str,
) -> Vec<Reportable<'a>> {
    diagnostics
        .iter()
        .map(|diagnostic| Reportable::Pipeline { diagnostic, source })
        .collect()
}

//! # Stagegraph Parser
//!
//! Extracts the stage structure of a Jenkins declarative pipeline. Only the
//! constructs needed to draw the pipeline are interpreted:
//!
//! - `pipeline { ... }`
//! - `stage('name') { ... }` and `stage("name") { ... }`
//! - `parallel { ... }`
//! - `steps { ... }` with `sh`, `echo` and `bat` calls
//!
//! Everything else (`agent`, `options`, `environment`, `post`, ...) is
//! inert. Parsing never fails on malformed input: broken stages are
//! skipped and reported as warnings.
//!
//! ## Usage
//!
//! ```
//! # use stagegraph_parser::{parse, ParseConfig};
//! let source = r#"
//!     pipeline {
//!         agent any
//!         stages {
//!             stage('Build') { steps { sh 'make' } }
//!             stage('Test') {
//!                 parallel {
//!                     stage('Unit') { steps { sh 'make test' } }
//!                     stage('Lint') { steps { sh 'make lint' } }
//!                 }
//!             }
//!         }
//!     }
//! "#;
//!
//! let parsed = parse(source, &ParseConfig::default()).expect("lenient parse never fails");
//! assert_eq!(parsed.stages().len(), 2);
//! assert!(parsed.diagnostics().is_empty());
//! ```

pub mod error;

mod block;
mod source;
mod span;
mod stages;
mod steps;

pub use block::extract_block;
pub use source::COMMENT_PATTERN;
pub use span::Span;
pub use stages::{STAGE_PATTERN, parse_stages};
pub use steps::{STEP_PATTERN, STEP_VERBS, extract_steps};

use log::{debug, info, warn};

use stagegraph_core::stage::Stage;

use block::BlockError;
use error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError};
use source::CleanSource;
use stages::StageScanner;

/// Default limit on nested parallel blocks.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Keyword introducing the whole pipeline.
const PIPELINE_KEYWORD: &str = "pipeline";

/// Options controlling a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    max_depth: usize,
    strict: bool,
}

impl ParseConfig {
    /// Creates a parse configuration.
    ///
    /// # Arguments
    ///
    /// * `max_depth` - Maximum number of nested parallel blocks. Deeper
    ///   parallel stages are skipped.
    /// * `strict` - Fail the parse if anything had to be skipped.
    pub fn new(max_depth: usize, strict: bool) -> Self {
        Self { max_depth, strict }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn strict(&self) -> bool {
        self.strict
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH, false)
    }
}

/// The result of a successful parse.
#[derive(Debug, Clone)]
pub struct Parsed {
    stages: Vec<Stage>,
    diagnostics: Vec<Diagnostic>,
}

impl Parsed {
    /// Returns the top-level stages in source order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Returns the warnings recorded while parsing.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consumes the result, returning only the stages.
    pub fn into_stages(self) -> Vec<Stage> {
        self.stages
    }
}

/// Parses a pipeline into its stage tree.
///
/// 1. **Strip comments** - remove `//` and `/* */` comments
/// 2. **Locate** - find the first `pipeline { ... }` block
/// 3. **Scan** - collect the stages of the pipeline body, branches nested
///    under their parallel stage
///
/// Stages are found anywhere in the pipeline body, whether or not they sit
/// inside a `stages { ... }` block.
///
/// # Errors
///
/// Only fails when [`ParseConfig::strict`] is set and at least one
/// diagnostic was recorded. The returned [`ParseError`] holds every
/// diagnostic, with spans into `source`.
pub fn parse(source: &str, config: &ParseConfig) -> Result<Parsed, ParseError> {
    let mut collector = if config.strict() {
        DiagnosticCollector::strict()
    } else {
        DiagnosticCollector::new()
    };

    let stages = parse_with(source, config.max_depth(), &mut collector);
    let diagnostics = collector.finish()?;

    info!(stages = stages.len(), warnings = diagnostics.len(); "Pipeline parsed");
    Ok(Parsed {
        stages,
        diagnostics,
    })
}

/// Parses a pipeline into its stage tree, discarding diagnostics.
///
/// Returns an empty list when there is no `pipeline { ... }` block.
///
/// # Examples
///
/// ```
/// # use stagegraph_parser::parse_pipeline;
/// let stages = parse_pipeline("pipeline { stage('Build') { steps { echo 'hi' } } }");
/// assert_eq!(stages[0].name(), "Build");
///
/// assert!(parse_pipeline("node { sh 'make' }").is_empty());
/// ```
pub fn parse_pipeline(source: &str) -> Vec<Stage> {
    let mut collector = DiagnosticCollector::new();
    parse_with(source, DEFAULT_MAX_DEPTH, &mut collector)
}

fn parse_with(source: &str, max_depth: usize, collector: &mut DiagnosticCollector) -> Vec<Stage> {
    let clean = CleanSource::strip_comments(source);

    let pipeline = match block::locate_block(clean.text(), PIPELINE_KEYWORD) {
        Ok(pipeline) => pipeline,
        Err(BlockError::Missing) => {
            warn!("No 'pipeline' block found");
            collector.emit(
                Diagnostic::warning("no `pipeline` block found")
                    .with_code(ErrorCode::E001)
                    .with_help("wrap the stages in `pipeline { ... }`"),
            );
            return Vec::new();
        }
        Err(BlockError::Unterminated { keyword }) => {
            warn!("Unterminated 'pipeline' block");
            collector.emit(
                Diagnostic::warning("could not find the end of the `pipeline` block")
                    .with_code(ErrorCode::E002)
                    .with_label(
                        clean.original_span(keyword.start, keyword.end),
                        "pipeline opened here",
                    )
                    .with_help("check that every `{` has a matching `}`"),
            );
            return Vec::new();
        }
    };

    debug!("Found 'pipeline' block");
    StageScanner::new(&clean, max_depth, collector).scan(pipeline.body, 0)
}

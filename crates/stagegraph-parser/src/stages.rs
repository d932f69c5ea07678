//! Stage tree construction.
//!
//! [`StageScanner`] walks the body of a pipeline or parallel block, finds
//! every `stage('name') {` it directly owns and classifies each one:
//!
//! 1. a stage containing a `parallel { ... }` block becomes a parallel
//!    stage whose branches are scanned recursively from that block's body;
//! 2. any other stage becomes a leaf whose steps come from its
//!    `steps { ... }` block, or no steps if it has none.
//!
//! The scan resumes after a leaf stage's opening brace, so stages declared
//! in a nested `stages { ... }` block follow their parent in sequence.
//! After a parallel stage it resumes past the whole block.
//!
//! Problems with one stage are reported to the collector and never stop
//! the scan.

use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use stagegraph_core::stage::Stage;

use crate::{
    block::{self, BlockError},
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    source::CleanSource,
    steps::extract_steps,
};

/// Pattern matching a stage declaration up to and including its `{`.
///
/// Capture group 1 is the stage name.
pub const STAGE_PATTERN: &str = r#"stage\s*\(\s*['"](.+?)['"]\s*\)\s*\{"#;

static STAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(STAGE_PATTERN).expect("stage pattern is valid"));

/// Keyword introducing the concurrent branches of a stage.
const PARALLEL_KEYWORD: &str = "parallel";

/// Keyword introducing the commands of a stage.
const STEPS_KEYWORD: &str = "steps";

/// Parses the stages directly owned by `text`.
///
/// `text` must be the body of a pipeline or parallel block. Comments are
/// not stripped and problems are not reported; use
/// [`parse`](crate::parse) for that.
///
/// # Examples
///
/// ```
/// # use stagegraph_parser::parse_stages;
/// let stages = parse_stages("stage('Build') { steps { sh 'make' } } stage('Ship') {}");
///
/// assert_eq!(stages.len(), 2);
/// assert_eq!(stages[0].steps(), ["make"]);
/// assert!(stages[1].steps().is_empty());
/// ```
pub fn parse_stages(text: &str) -> Vec<Stage> {
    let source = CleanSource::verbatim(text);
    let mut diagnostics = DiagnosticCollector::new();
    let mut scanner = StageScanner::new(&source, crate::DEFAULT_MAX_DEPTH, &mut diagnostics);

    scanner.scan(0..text.len(), 0)
}

/// Recursive stage scanner over one cleaned source.
///
/// All offsets handled here are byte offsets into the cleaned text.
pub(crate) struct StageScanner<'a> {
    source: &'a CleanSource,
    max_depth: usize,
    diagnostics: &'a mut DiagnosticCollector,
}

impl<'a> StageScanner<'a> {
    pub(crate) fn new(
        source: &'a CleanSource,
        max_depth: usize,
        diagnostics: &'a mut DiagnosticCollector,
    ) -> Self {
        Self {
            source,
            max_depth,
            diagnostics,
        }
    }

    /// Scans `region` for the stages it directly owns.
    ///
    /// `depth` is the number of parallel blocks enclosing `region`.
    pub(crate) fn scan(&mut self, region: std::ops::Range<usize>, depth: usize) -> Vec<Stage> {
        let source = self.source;
        let text = &source.text()[region.clone()];
        let mut stages = Vec::new();
        let mut cursor = 0;

        while let Some(captures) = STAGE_REGEX.captures_at(text, cursor) {
            let (Some(declaration), Some(name)) = (captures.get(0), captures.get(1)) else {
                break;
            };
            let declaration = region.start + declaration.start()..region.start + declaration.end();
            let name = name.as_str();
            let open = declaration.end - 1;

            let Some(stage_block) = block::balanced_block(&source.text()[..region.end], open)
            else {
                warn!(stage = name; "Could not extract block for stage");
                self.diagnostics.emit(
                    Diagnostic::warning(format!("could not find the end of stage `{name}`"))
                        .with_code(ErrorCode::E100)
                        .with_label(
                            source.original_span(declaration.start, declaration.end),
                            "stage opened here",
                        )
                        .with_help("check that every `{` in this stage has a matching `}`"),
                );
                cursor = declaration.end - region.start;
                continue;
            };

            // Branches belong to the parallel stage, but stages nested in a
            // leaf are still scanned as siblings.
            let stage = self.classify(name, declaration.clone(), stage_block.body, depth);
            let resume = match &stage {
                Some(stage) if !stage.is_parallel() => declaration.end,
                _ => stage_block.end,
            };
            stages.extend(stage);
            cursor = resume - region.start;
        }

        stages
    }

    /// Builds one stage from its body.
    fn classify(
        &mut self,
        name: &str,
        declaration: std::ops::Range<usize>,
        body: std::ops::Range<usize>,
        depth: usize,
    ) -> Option<Stage> {
        let source = self.source;
        let body_text = &source.text()[body.clone()];

        match block::locate_block(body_text, PARALLEL_KEYWORD) {
            Ok(parallel) => {
                let keyword = body.start + parallel.keyword.start..body.start + parallel.keyword.end;

                if depth >= self.max_depth {
                    warn!(stage = name, depth; "Parallel nesting too deep, skipping stage");
                    self.diagnostics.emit(
                        Diagnostic::warning(format!(
                            "parallel stage `{name}` is nested more than {} levels deep",
                            self.max_depth
                        ))
                        .with_code(ErrorCode::E102)
                        .with_label(
                            source.original_span(declaration.start, declaration.end),
                            "stage declared here",
                        )
                        .with_secondary_label(
                            source.original_span(keyword.start, keyword.end),
                            "parallel block",
                        )
                        .with_help("flatten the nested parallel blocks or raise `max_depth`"),
                    );
                    return None;
                }

                debug!(stage = name; "Stage contains a parallel block");
                let branches_region =
                    body.start + parallel.body.start..body.start + parallel.body.end;
                let branches = self.scan(branches_region, depth + 1);
                return Some(Stage::parallel(name, branches));
            }
            Err(BlockError::Unterminated { .. }) => {
                debug!(stage = name; "Ignoring unterminated parallel block");
            }
            Err(BlockError::Missing) => {}
        }

        let steps = match block::locate_block(body_text, STEPS_KEYWORD) {
            Ok(steps) => {
                let steps_text = &body_text[steps.body];
                debug!(stage = name, content = steps_text; "Found steps block");
                extract_steps(steps_text)
            }
            Err(_) => {
                warn!(stage = name; "No steps block found in stage");
                self.diagnostics.emit(
                    Diagnostic::warning(format!("stage `{name}` has no steps block"))
                        .with_code(ErrorCode::E101)
                        .with_label(
                            source.original_span(declaration.start, declaration.end),
                            "stage declared here",
                        ),
                );
                Vec::new()
            }
        };

        Some(Stage::leaf(name, steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagegraph_core::stage::StageKind;

    fn scan(text: &str, max_depth: usize) -> (Vec<Stage>, Vec<Diagnostic>) {
        let source = CleanSource::verbatim(text);
        let mut diagnostics = DiagnosticCollector::new();
        let stages = StageScanner::new(&source, max_depth, &mut diagnostics).scan(0..text.len(), 0);
        (stages, diagnostics.finish().unwrap())
    }

    #[test]
    fn test_stage_pattern_accepts_both_quotes() {
        let regex = Regex::new(STAGE_PATTERN).unwrap();

        assert!(regex.is_match("stage('Build') {"));
        assert!(regex.is_match("stage ( \"Build\" ){"));
        assert!(!regex.is_match("stage('Build')"));
        assert!(!regex.is_match("stage(name: 'Build') {"));
    }

    #[test]
    fn test_leaf_stage() {
        let stages = parse_stages("stage('Build') { steps { echo 'Building...' } }");

        assert_eq!(stages, vec![Stage::leaf("Build", vec!["Building...".to_string()])]);
    }

    #[test]
    fn test_nested_stages_are_owned_by_their_parent() {
        let text = r#"
            stage('Test') {
                parallel {
                    stage('Unit') { steps { sh 'unit' } }
                    stage('Lint') { steps { sh 'lint' } }
                }
            }
            stage('Deploy') { steps { sh 'deploy' } }
        "#;
        let stages = parse_stages(text);

        let names: Vec<_> = stages.iter().map(Stage::name).collect();
        assert_eq!(names, ["Test", "Deploy"]);
        assert_eq!(stages[0].kind(), StageKind::Parallel);

        let branches: Vec<_> = stages[0].branches().iter().map(Stage::name).collect();
        assert_eq!(branches, ["Unit", "Lint"]);
    }

    #[test]
    fn test_sequential_stages_inside_leaf_follow_their_parent() {
        let text = r#"
            stage('Outer') {
                stages {
                    stage('A') { steps { sh 'a' } }
                    stage('B') { steps { sh 'b' } }
                }
            }
            stage('After') { steps { sh 'after' } }
        "#;
        let (stages, diagnostics) = scan(text, 8);

        let names: Vec<_> = stages.iter().map(Stage::name).collect();
        assert_eq!(names, ["Outer", "A", "B", "After"]);
        assert!(stages.iter().all(|stage| !stage.is_parallel()));
        assert_eq!(stages[1].steps(), ["a"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_parallel_branches_are_not_rescanned() {
        let text = "stage('P') { parallel { stage('X') { steps { sh 'x' } } } } stage('Q') { steps { sh 'q' } }";
        let stages = parse_stages(text);

        let names: Vec<_> = stages.iter().map(Stage::name).collect();
        assert_eq!(names, ["P", "Q"]);
    }

    #[test]
    fn test_parallel_wins_over_steps() {
        let text = "stage('Mixed') { steps { sh 'x' } parallel { stage('Only') { } } }";
        let stages = parse_stages(text);

        assert!(stages[0].is_parallel());
        assert!(stages[0].steps().is_empty());
        assert_eq!(stages[0].branches()[0].name(), "Only");
    }

    #[test]
    fn test_unterminated_stage_is_skipped() {
        let text = "stage('Broken') { steps { echo 'a' } stage('Fine') { steps { echo 'b' } }";
        let (stages, diagnostics) = scan(text, 8);

        assert_eq!(stages, vec![Stage::leaf("Fine", vec!["b".to_string()])]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E100));
        assert_eq!(&text[diagnostics[0].labels()[0].span().to_range()], "stage('Broken') {");
    }

    #[test]
    fn test_missing_steps_block_is_reported() {
        let (stages, diagnostics) = scan("stage('Empty') { agent any }", 8);

        assert_eq!(stages, vec![Stage::leaf("Empty", vec![])]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E101));
    }

    #[test]
    fn test_brace_in_string_drops_stage() {
        let text = "stage('Odd') { steps { sh 'a' } parallel { echo '{' } } stage('Next') { steps { sh 'n' } }";
        let (stages, diagnostics) = scan(text, 8);

        // The quoted `{` is counted, so `Odd` never closes and only `Next` survives.
        assert_eq!(stages, vec![Stage::leaf("Next", vec!["n".to_string()])]);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E100));
    }

    #[test]
    fn test_depth_limit_skips_deep_parallel() {
        let text = r#"
            stage('Outer') {
                parallel {
                    stage('Inner') {
                        parallel {
                            stage('Leaf') { steps { sh 'x' } }
                        }
                    }
                    stage('Sibling') { steps { sh 'y' } }
                }
            }
        "#;
        let (stages, diagnostics) = scan(text, 1);

        assert_eq!(stages.len(), 1);
        let branches: Vec<_> = stages[0].branches().iter().map(Stage::name).collect();
        assert_eq!(branches, ["Sibling"]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E102));
        assert_eq!(diagnostics[0].labels().len(), 2);
    }

    #[test]
    fn test_depth_zero_allows_no_parallel() {
        let (stages, diagnostics) = scan("stage('P') { parallel { } } stage('L') { steps { } }", 0);

        assert_eq!(stages, vec![Stage::leaf("L", vec![])]);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E102));
    }

    #[test]
    fn test_empty_parallel_block() {
        let stages = parse_stages("stage('Nothing') { parallel { } }");

        assert_eq!(stages, vec![Stage::parallel("Nothing", vec![])]);
    }
}

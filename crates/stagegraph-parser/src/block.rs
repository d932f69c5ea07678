//! Brace-balanced block extraction.
//!
//! A block is a keyword followed by optional whitespace and a `{`, such as
//! `pipeline {`, `steps {` or `parallel {`. Its body is everything between
//! that `{` and the `}` that brings the nesting count back to zero.
//!
//! Braces are counted blindly: a `{` or `}` inside a string literal counts
//! like any other. Comments must be stripped before calling in here.

use std::ops::Range;

/// A located block, as byte offsets into the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Block {
    /// The keyword that introduced the block, when one was searched for.
    pub(crate) keyword: Range<usize>,
    /// The body with surrounding whitespace trimmed.
    pub(crate) body: Range<usize>,
    /// Offset just past the closing `}`.
    pub(crate) end: usize,
}

/// Why a block could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BlockError {
    /// No `keyword {` in the text.
    Missing,
    /// The keyword was found but its braces never balance.
    Unterminated { keyword: Range<usize> },
}

/// Extracts the trimmed body of the first `keyword { ... }` block in `text`.
///
/// Returns `None` both when the keyword is absent and when its braces
/// never balance.
///
/// # Examples
///
/// ```
/// # use stagegraph_parser::extract_block;
/// let text = "agent any\nsteps {\n  sh 'make'\n  dir('out') { sh 'ls' }\n}";
/// assert_eq!(extract_block(text, "steps"), Some("sh 'make'\n  dir('out') { sh 'ls' }"));
///
/// assert_eq!(extract_block(text, "post"), None);
/// assert_eq!(extract_block("steps { sh 'make'", "steps"), None);
/// ```
pub fn extract_block<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    locate_block(text, keyword).ok().map(|block| &text[block.body])
}

/// Locates the first `keyword { ... }` block in `text`.
///
/// The keyword is matched literally with no word boundary, so `mysteps {`
/// also matches `steps`.
pub(crate) fn locate_block(text: &str, keyword: &str) -> Result<Block, BlockError> {
    let (keyword_range, open) = find_opening(text, keyword).ok_or(BlockError::Missing)?;

    match balanced_block(text, open) {
        Some(block) => Ok(Block {
            keyword: keyword_range,
            ..block
        }),
        None => Err(BlockError::Unterminated {
            keyword: keyword_range,
        }),
    }
}

/// Scans from the `{` at `open` for its matching `}`.
///
/// Returns `None` if the nesting count never returns to zero. The returned
/// block's `keyword` range is empty and sits at `open`.
pub(crate) fn balanced_block(text: &str, open: usize) -> Option<Block> {
    let bytes = text.as_bytes();
    debug_assert_eq!(bytes.get(open), Some(&b'{'));

    let mut depth = 0usize;
    for (index, byte) in bytes.iter().enumerate().skip(open) {
        match byte {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            _ => continue,
        }

        if depth == 0 {
            return Some(Block {
                keyword: open..open,
                body: trimmed(text, open + 1..index),
                end: index + 1,
            });
        }
    }

    None
}

/// Finds the leftmost `keyword`, optional whitespace, `{`.
///
/// Returns the keyword range and the offset of the `{`.
fn find_opening(text: &str, keyword: &str) -> Option<(Range<usize>, usize)> {
    let mut from = 0;

    while let Some(found) = text[from..].find(keyword) {
        let start = from + found;
        let after = start + keyword.len();
        let rest = &text[after..];
        let open = after + (rest.len() - rest.trim_start().len());

        if text[open..].starts_with('{') {
            return Some((start..after, open));
        }

        // Step one character so overlapping occurrences are still tried.
        from = start + text[start..].chars().next().map_or(1, char::len_utf8);
        if from > text.len() {
            break;
        }
    }

    None
}

fn trimmed(text: &str, range: Range<usize>) -> Range<usize> {
    let slice = &text[range.clone()];
    let leading = slice.len() - slice.trim_start().len();
    let trailing = slice.len() - slice.trim_end().len();

    if leading == slice.len() {
        range.start..range.start
    } else {
        range.start + leading..range.end - trailing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_block() {
        assert_eq!(extract_block("steps { echo 'hi' }", "steps"), Some("echo 'hi'"));
    }

    #[test]
    fn test_extract_without_whitespace_before_brace() {
        assert_eq!(extract_block("parallel{a}", "parallel"), Some("a"));
    }

    #[test]
    fn test_extract_nested_braces() {
        let text = "pipeline { stages { stage('A') { steps { sh 'x' } } } } tail";
        assert_eq!(
            extract_block(text, "pipeline"),
            Some("stages { stage('A') { steps { sh 'x' } } }")
        );
    }

    #[test]
    fn test_extract_first_occurrence_only() {
        let text = "steps { one } steps { two }";
        assert_eq!(extract_block(text, "steps"), Some("one"));
    }

    #[test]
    fn test_keyword_without_brace_is_skipped() {
        let text = "echo 'steps' \n steps { real }";
        assert_eq!(extract_block(text, "steps"), Some("real"));
    }

    #[test]
    fn test_keyword_has_no_word_boundary() {
        assert_eq!(extract_block("mysteps { x }", "steps"), Some("x"));
    }

    #[test]
    fn test_missing_block() {
        assert_eq!(locate_block("agent any", "pipeline"), Err(BlockError::Missing));
        assert_eq!(extract_block("", "pipeline"), None);
    }

    #[test]
    fn test_unterminated_block() {
        assert_eq!(
            locate_block("  pipeline { stage('A') {", "pipeline"),
            Err(BlockError::Unterminated { keyword: 2..10 })
        );
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(extract_block("steps {   }", "steps"), Some(""));
        assert_eq!(extract_block("steps {}", "steps"), Some(""));
    }

    #[test]
    fn test_braces_in_strings_are_counted() {
        // Known limitation: the `}` inside the string closes the block early.
        assert_eq!(extract_block("steps { echo '}' }", "steps"), Some("echo '"));
    }

    #[test]
    fn test_located_block_offsets() {
        let text = "x pipeline {\n  body\n} y";
        let block = locate_block(text, "pipeline").unwrap();

        assert_eq!(&text[block.keyword.clone()], "pipeline");
        assert_eq!(&text[block.body.clone()], "body");
        assert_eq!(&text[block.end..], " y");
    }

    #[test]
    fn test_balanced_block_from_offset() {
        let text = "stage('A') { a { b } } rest";
        let block = balanced_block(text, 11).unwrap();

        assert_eq!(&text[block.body], "a { b }");
        assert_eq!(&text[block.end..], " rest");
        assert!(balanced_block("{ {", 0).is_none());
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(extract_block("é steps { ünïcode }", "steps"), Some("ünïcode"));
    }
}

//! Comment stripping.
//!
//! Comments are removed before any block is located, so the scanners only
//! ever see code. Removal is purely textual: a `//` or `/*` inside a string
//! literal is treated as a comment too.
//!
//! [`CleanSource`] remembers where every kept piece of text came from, so
//! offsets found in the cleaned text can be mapped back to the source the
//! user wrote.

use std::sync::LazyLock;

use regex::Regex;

use crate::span::Span;

/// Pattern matching a `//` line comment or a `/* */` block comment.
pub const COMMENT_PATTERN: &str = r"//.*|/\*[\s\S]*?\*/";

static COMMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(COMMENT_PATTERN).expect("comment pattern is valid"));

/// A run of cleaned text copied verbatim from the original.
#[derive(Debug, Clone, Copy)]
struct Segment {
    clean_start: usize,
    original_start: usize,
}

/// Source text with comments removed, plus a map back to the original.
#[derive(Debug, Clone)]
pub(crate) struct CleanSource {
    text: String,
    segments: Vec<Segment>,
}

impl CleanSource {
    /// Removes all comments from `source`.
    pub(crate) fn strip_comments(source: &str) -> Self {
        let mut text = String::with_capacity(source.len());
        let mut segments = Vec::new();
        let mut last = 0;

        for comment in COMMENT_REGEX.find_iter(source) {
            Self::keep(&mut text, &mut segments, source, last..comment.start());
            last = comment.end();
        }
        Self::keep(&mut text, &mut segments, source, last..source.len());

        Self { text, segments }
    }

    /// Wraps `source` without removing anything.
    pub(crate) fn verbatim(source: &str) -> Self {
        Self {
            text: source.to_string(),
            segments: vec![Segment {
                clean_start: 0,
                original_start: 0,
            }],
        }
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    /// Maps a byte range of the cleaned text to a span of the original.
    pub(crate) fn original_span(&self, start: usize, end: usize) -> Span {
        let original_start = self.original_offset(start);
        let original_end = if end > start {
            self.original_offset(end - 1) + 1
        } else {
            original_start
        };
        Span::new(original_start..original_end)
    }

    fn original_offset(&self, clean: usize) -> usize {
        let index = self
            .segments
            .partition_point(|segment| segment.clean_start <= clean)
            .saturating_sub(1);

        match self.segments.get(index) {
            Some(segment) => segment.original_start + (clean - segment.clean_start),
            None => clean,
        }
    }

    fn keep(
        text: &mut String,
        segments: &mut Vec<Segment>,
        source: &str,
        range: std::ops::Range<usize>,
    ) {
        if range.is_empty() {
            return;
        }
        segments.push(Segment {
            clean_start: text.len(),
            original_start: range.start,
        });
        text.push_str(&source[range]);
    }
}

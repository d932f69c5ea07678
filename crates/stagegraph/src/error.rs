//! Error types for Stagegraph operations.
//!
//! This module provides the main error type [`StagegraphError`] which wraps
//! the error conditions that can occur while turning a pipeline into a graph.

use std::io;

use thiserror::Error;

use stagegraph_parser::error::ParseError;

/// The main error type for Stagegraph operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the diagnostics so
/// their spans can be rendered as code snippets.
#[derive(Debug, Error)]
pub enum StagegraphError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(#[from] serde_json::Error),
}

impl StagegraphError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

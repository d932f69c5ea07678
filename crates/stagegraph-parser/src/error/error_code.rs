//! Error codes for the Stagegraph diagnostic system.
//!
//! Error codes are organized by scope:
//! - `E0xx` - Pipeline-level problems
//! - `E1xx` - Stage-level problems

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Pipeline Errors (E0xx)
    // =========================================================================
    /// Pipeline block not found.
    ///
    /// The source has no `pipeline { ... }` block, so there is nothing to show.
    E001,

    /// Unterminated pipeline block.
    ///
    /// A `pipeline {` was found but its braces never balance.
    E002,

    // =========================================================================
    // Stage Errors (E1xx)
    // =========================================================================
    /// Unterminated stage block.
    ///
    /// A `stage('name') {` was found but its braces never balance. The stage
    /// is skipped.
    E100,

    /// Missing steps block.
    ///
    /// A non-parallel stage has no `steps { ... }` block. The stage is kept
    /// with no steps.
    E101,

    /// Parallel nesting too deep.
    ///
    /// A parallel stage is nested deeper than the configured limit. The
    /// stage is skipped.
    E102,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "pipeline block not found",
            ErrorCode::E002 => "unterminated pipeline block",
            ErrorCode::E100 => "unterminated stage block",
            ErrorCode::E101 => "missing steps block",
            ErrorCode::E102 => "parallel nesting too deep",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E102.to_string(), "E102");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E002.description(), "unterminated pipeline block");
        assert_eq!(ErrorCode::E101.description(), "missing steps block");
    }
}

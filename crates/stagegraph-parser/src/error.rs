//! Diagnostics reported while parsing a pipeline.
//!
//! Parsing is forgiving: a malformed stage is skipped and the rest of the
//! pipeline is still returned. Every skip is recorded as a [`Diagnostic`]
//! so callers can show the user what was left out.
//!
//! # Overview
//!
//! - [`Diagnostic`] - a single warning or error with an optional
//!   [`ErrorCode`], labelled source spans and help text
//! - [`DiagnosticCollector`] - accumulates diagnostics during one parse
//! - [`ParseError`] - one or more diagnostics returned when parsing is strict
//!
//! # Example
//!
//! ```
//! # use stagegraph_parser::error::{Diagnostic, ErrorCode};
//! # use stagegraph_parser::Span;
//!
//! let diag = Diagnostic::warning("could not find the end of stage `Build`")
//!     .with_code(ErrorCode::E100)
//!     .with_label(Span::new(20..37), "stage opened here")
//!     .with_help("check that every `{` has a matching `}`");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;

//! Command-line argument definitions for the Stagegraph CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, the output document, and logging verbosity.

use clap::{Parser, ValueEnum};

use stagegraph::export::ExportFormat;

/// Command-line arguments for the Stagegraph tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input Jenkinsfile
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output JSON file
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Shape of the output document
    #[arg(short, long, value_enum, default_value_t = Format::Flow)]
    pub format: Format,

    /// Indent the output JSON
    #[arg(long)]
    pub pretty: bool,

    /// Fail instead of skipping malformed stages
    #[arg(long)]
    pub strict: bool,
}

/// Output document selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Renderer-ready flow-chart document
    Flow,
    /// Bare nodes and edges
    Layout,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Flow => ExportFormat::Flow,
            Format::Layout => ExportFormat::Layout,
        }
    }
}

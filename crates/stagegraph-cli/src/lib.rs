//! CLI logic for the Stagegraph tool.
//!
//! This module contains the core CLI logic: load configuration, read a
//! Jenkinsfile, build its stage graph and write the JSON document.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Format};

use std::fs;

use log::{info, warn};

use stagegraph::{GraphBuilder, StagegraphError, config::ParserConfig};

use error_adapter::{Reportable, warning_reportables};

/// Run the Stagegraph CLI application
///
/// This function processes the input file through parse, layout and export
/// and writes the resulting JSON to the output file. Skipped stages are
/// reported as warnings and do not fail the run unless `--strict` is set.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `StagegraphError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors in strict mode
/// - Export errors
pub fn run(args: &Args) -> Result<(), StagegraphError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing pipeline"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if args.strict {
        let parser = ParserConfig::new(app_config.parser().max_depth(), true);
        app_config = app_config.with_parser(parser);
    }

    let source = fs::read_to_string(&args.input)?;

    let builder = GraphBuilder::new(app_config);
    let parsed = builder.parse(&source)?;
    for warning in warning_reportables(parsed.diagnostics(), &source) {
        warn!("{}", render(&warning));
    }

    let layout = builder.layout(parsed.stages())?;
    let json = builder.render_json(&layout, args.format.into(), args.pretty)?;

    fs::write(&args.output, json)?;

    info!(
        output_file = args.output,
        nodes = layout.nodes().len(),
        edges = layout.edges().len();
        "Stage graph exported successfully"
    );

    Ok(())
}

/// Render a reportable with miette's graphical handler.
pub fn render(reportable: &Reportable<'_>) -> String {
    let reporter = miette::GraphicalReportHandler::new();
    let mut writer = String::new();
    reporter
        .render_report(&mut writer, reportable)
        .expect("Writing to String buffer is infallible");
    writer
}

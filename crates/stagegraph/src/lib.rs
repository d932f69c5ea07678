//! Stagegraph - Jenkins declarative pipelines as stage graphs.
//!
//! Parsing, layout, and export of the stage structure of a declarative
//! pipeline. Sequential stages flow left to right and the branches of a
//! parallel stage are stacked top to bottom.

pub mod config;
pub mod export;
pub mod layout;

mod error;

pub use stagegraph_core::{geometry, graph, stage};
pub use stagegraph_parser::Parsed;

pub use error::StagegraphError;

use log::{debug, info, trace};

use config::AppConfig;
use export::{ExportFormat, Exporter, LayoutExporter, flow::FlowExporter};
use layout::{Layout, LayoutEngine};
use stage::Stage;

/// Builder for turning pipelines into stage graphs.
///
/// Runs the parse, layout and export phases with one configuration.
///
/// # Examples
///
/// ```rust
/// use stagegraph::{GraphBuilder, config::AppConfig, export::ExportFormat};
///
/// let source = "pipeline { stages { stage('Build') { steps { sh 'make' } } } }";
///
/// // With custom config
/// let builder = GraphBuilder::new(AppConfig::default());
///
/// let parsed = builder.parse(source).expect("Failed to parse");
/// let layout = builder.layout(parsed.stages()).expect("Failed to lay out");
///
/// let json = builder
///     .render_json(&layout, ExportFormat::Flow, false)
///     .expect("Failed to export");
/// assert!(json.contains("stage-Build"));
///
/// // Or use default config
/// let builder = GraphBuilder::default();
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    config: AppConfig,
}

impl GraphBuilder {
    /// Create a new graph builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including parser, layout and
    ///   style settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration the builder was created with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a pipeline into its stage tree.
    ///
    /// Malformed stages are skipped. Each skip is logged and kept as a
    /// warning diagnostic in the result.
    ///
    /// # Errors
    ///
    /// Returns [`StagegraphError::Parse`] when strict parsing is configured
    /// and anything had to be skipped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stagegraph::GraphBuilder;
    ///
    /// let parsed = GraphBuilder::default()
    ///     .parse("not a pipeline")
    ///     .expect("lenient parsing does not fail");
    /// assert!(parsed.stages().is_empty());
    /// ```
    pub fn parse(&self, source: &str) -> Result<Parsed, StagegraphError> {
        info!("Parsing pipeline");

        let parse_config = self.config.parser().to_parse_config();
        let parsed = stagegraph_parser::parse(source, &parse_config)
            .map_err(|err| StagegraphError::new_parse_error(err, source))?;

        debug!(
            stages = parsed.stages().len(),
            warnings = parsed.diagnostics().len();
            "Pipeline parsed successfully"
        );
        trace!(stages:? = parsed.stages(); "Parsed stages");

        Ok(parsed)
    }

    /// Lay out a stage tree with the configured node size and spacing.
    ///
    /// Every call starts from an empty set of placed stage names.
    ///
    /// # Errors
    ///
    /// Returns [`StagegraphError::Config`] if the node size or spacing
    /// would let nodes overlap.
    pub fn layout(&self, stages: &[Stage]) -> Result<Layout, StagegraphError> {
        info!(stages = stages.len(); "Calculating layout");

        let metrics = self.config.layout();
        metrics.validate().map_err(StagegraphError::Config)?;

        Ok(LayoutEngine::new(metrics).layout(stages))
    }

    /// Parse and lay out a pipeline in one call.
    ///
    /// # Errors
    ///
    /// See [`GraphBuilder::parse`] and [`GraphBuilder::layout`].
    pub fn build(&self, source: &str) -> Result<Layout, StagegraphError> {
        let parsed = self.parse(source)?;
        self.layout(parsed.stages())
    }

    /// Serialize a layout to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StagegraphError::Config`] if the configured style is
    /// invalid, or [`StagegraphError::Export`] if serialization fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stagegraph::{GraphBuilder, export::ExportFormat};
    ///
    /// let builder = GraphBuilder::default();
    /// let layout = builder.build("").expect("Failed to build");
    ///
    /// let json = builder
    ///     .render_json(&layout, ExportFormat::Layout, false)
    ///     .expect("Failed to export");
    /// assert_eq!(json, r#"{"nodes":[],"edges":[]}"#);
    /// ```
    pub fn render_json(
        &self,
        layout: &Layout,
        format: ExportFormat,
        pretty: bool,
    ) -> Result<String, StagegraphError> {
        info!(format:?; "Exporting layout");

        let json = match format {
            ExportFormat::Flow => {
                let style = self.config.style();
                style.validate().map_err(StagegraphError::Config)?;
                FlowExporter::new(style, pretty).export_layout(layout)?
            }
            ExportFormat::Layout => LayoutExporter::new(pretty).export_layout(layout)?,
        };

        debug!(bytes = json.len(); "Layout exported");
        Ok(json)
    }
}

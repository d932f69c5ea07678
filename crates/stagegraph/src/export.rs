//! Export of laid-out stage graphs.
//!
//! ```text
//! Jenkinsfile
//!     ↓ parse
//! Stage tree
//!     ↓ layout
//! Positioned nodes and edges (Layout)
//!     ↓ export (this module)
//! JSON document
//! ```
//!
//! # Available Formats
//!
//! - [`ExportFormat::Flow`] - a flow-chart document via [`flow::FlowExporter`]
//! - [`ExportFormat::Layout`] - the bare nodes and edges via [`LayoutExporter`]

/// Flow-chart document export.
pub mod flow;

use crate::layout::Layout;

/// Output document shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Renderer-ready nodes and edges with node types and edge styling.
    #[default]
    Flow,
    /// Node ids, names, steps and positions plus edge ids and endpoints.
    Layout,
}

/// Abstraction for export backends.
pub trait Exporter {
    /// Serializes `layout` into the backend's document.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error if the document cannot be written.
    fn export_layout(&self, layout: &Layout) -> Result<String, serde_json::Error>;
}

/// Writes the layout as it is, with no renderer-specific fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutExporter {
    pretty: bool,
}

impl LayoutExporter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Exporter for LayoutExporter {
    fn export_layout(&self, layout: &Layout) -> Result<String, serde_json::Error> {
        to_json(layout, self.pretty)
    }
}

pub(crate) fn to_json<T: serde::Serialize>(
    value: &T,
    pretty: bool,
) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

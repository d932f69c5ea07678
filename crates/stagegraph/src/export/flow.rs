//! Flow-chart document export.
//!
//! The document is the shape node-graph UI renderers consume directly:
//! every node is a `customNode` whose label and steps sit under `data`, and
//! every edge is a `smoothstep` connector ending in a closed arrowhead.

use serde::Serialize;

use stagegraph_core::{
    geometry::Point,
    graph::{Anchor, Edge, LayoutNode},
};

use super::Exporter;
use crate::{config::StyleConfig, layout::Layout};

const NODE_TYPE: &str = "customNode";
const EDGE_TYPE: &str = "smoothstep";
const MARKER_TYPE: &str = "arrowclosed";

/// Renderer-ready view of a [`Layout`].
///
/// Borrows from the layout and style it was built from.
#[derive(Debug, Serialize)]
pub struct FlowDocument<'a> {
    nodes: Vec<FlowNode<'a>>,
    edges: Vec<FlowEdge<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FlowNode<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    data: NodeData<'a>,
    position: Point,
    source_position: Anchor,
    target_position: Anchor,
}

#[derive(Debug, Serialize)]
struct NodeData<'a> {
    label: &'a str,
    steps: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FlowEdge<'a> {
    id: &'a str,
    source: &'a str,
    target: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    style: EdgeStyle<'a>,
    marker_end: Marker<'a>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct EdgeStyle<'a> {
    stroke: &'a str,
    stroke_width: f32,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct Marker<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    color: &'a str,
}

impl<'a> FlowDocument<'a> {
    /// Builds the document for `layout`, styling every edge from `style`.
    pub fn new(layout: &'a Layout, style: &'a StyleConfig) -> Self {
        let edge_style = EdgeStyle {
            stroke: style.edge_color(),
            stroke_width: style.edge_width(),
        };
        let marker = Marker {
            kind: MARKER_TYPE,
            color: style.edge_color(),
        };

        Self {
            nodes: layout.nodes().iter().map(FlowNode::from_node).collect(),
            edges: layout
                .edges()
                .iter()
                .map(|edge| FlowEdge::from_edge(edge, edge_style, marker))
                .collect(),
        }
    }

    /// Serializes the document, indented if `pretty` is set.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error if the document cannot be written.
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        super::to_json(self, pretty)
    }
}

impl<'a> FlowNode<'a> {
    fn from_node(node: &'a LayoutNode) -> Self {
        Self {
            id: node.id(),
            kind: NODE_TYPE,
            data: NodeData {
                label: node.name(),
                steps: node.steps(),
            },
            position: node.position(),
            source_position: node.anchor_out(),
            target_position: node.anchor_in(),
        }
    }
}

impl<'a> FlowEdge<'a> {
    fn from_edge(edge: &'a Edge, style: EdgeStyle<'a>, marker_end: Marker<'a>) -> Self {
        Self {
            id: edge.id(),
            source: edge.source(),
            target: edge.target(),
            kind: EDGE_TYPE,
            style,
            marker_end,
        }
    }
}

/// Exports layouts as [`FlowDocument`]s.
#[derive(Debug, Clone)]
pub struct FlowExporter<'a> {
    style: &'a StyleConfig,
    pretty: bool,
}

impl<'a> FlowExporter<'a> {
    pub fn new(style: &'a StyleConfig, pretty: bool) -> Self {
        Self { style, pretty }
    }
}

impl Exporter for FlowExporter<'_> {
    fn export_layout(&self, layout: &Layout) -> Result<String, serde_json::Error> {
        FlowDocument::new(layout, self.style).to_json(self.pretty)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use stagegraph_core::stage::Stage;

    use super::*;
    use crate::{config::LayoutConfig, layout::LayoutEngine};

    fn sample_layout() -> Layout {
        let stages = vec![
            Stage::leaf("Build", vec!["make".to_string()]),
            Stage::leaf("Unit Tests", vec![]),
        ];
        LayoutEngine::new(&LayoutConfig::default()).layout(&stages)
    }

    fn export(layout: &Layout, style: &StyleConfig) -> Value {
        let json = FlowDocument::new(layout, style).to_json(false).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_node_shape() {
        let value = export(&sample_layout(), &StyleConfig::default());

        assert_eq!(
            value["nodes"][0],
            json!({
                "id": "stage-Build",
                "type": "customNode",
                "data": {"label": "Build", "steps": ["make"]},
                "position": {"x": 0.0, "y": 0.0},
                "sourcePosition": "right",
                "targetPosition": "left",
            })
        );
        assert_eq!(value["nodes"][1]["id"], "stage-Unit-Tests");
        assert_eq!(value["nodes"][1]["data"]["label"], "Unit Tests");
    }

    #[test]
    fn test_edge_shape() {
        let value = export(&sample_layout(), &StyleConfig::default());

        assert_eq!(
            value["edges"],
            json!([{
                "id": "e-stage-Build-stage-Unit-Tests",
                "source": "stage-Build",
                "target": "stage-Unit-Tests",
                "type": "smoothstep",
                "style": {"stroke": "#b1b1b7", "strokeWidth": 2.0},
                "markerEnd": {"type": "arrowclosed", "color": "#b1b1b7"},
            }])
        );
    }

    #[test]
    fn test_custom_edge_style() {
        let style = StyleConfig::new("steelblue", 3.5);
        let value = export(&sample_layout(), &style);

        assert_eq!(value["edges"][0]["style"]["stroke"], "steelblue");
        assert_eq!(value["edges"][0]["style"]["strokeWidth"], 3.5);
        assert_eq!(value["edges"][0]["markerEnd"]["color"], "steelblue");
    }

    #[test]
    fn test_empty_layout() {
        let layout = Layout::default();
        let style = StyleConfig::default();

        let json = FlowExporter::new(&style, false).export_layout(&layout).unwrap();
        assert_eq!(json, r#"{"nodes":[],"edges":[]}"#);
    }
}

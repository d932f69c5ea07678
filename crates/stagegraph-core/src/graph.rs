//! Positioned nodes and edges produced by the layout transformer.
//!
//! Edges refer to nodes by id only. Both ids are pure functions of stage
//! names, so identical input always produces identical ids:
//!
//! - node id: `stage-` followed by the name with each whitespace run
//!   replaced by a single `-` (see [`node_id`])
//! - edge id: `e-{source}-{target}` (see [`edge_id`])
//!
//! Node ids are not guaranteed unique: `"a b"` and `"a  b"` share an id.

use serde::Serialize;

use crate::geometry::Point;

/// The side of a node an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Left,
    Right,
}

/// Derives a node id from a stage name.
///
/// # Examples
///
/// ```
/// # use stagegraph_core::graph::node_id;
/// assert_eq!(node_id("Unit Tests"), "stage-Unit-Tests");
/// assert_eq!(node_id("a \t b"), "stage-a-b");
/// ```
pub fn node_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len() + 6);
    id.push_str("stage-");

    let mut in_whitespace = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                id.push('-');
            }
            in_whitespace = true;
        } else {
            id.push(ch);
            in_whitespace = false;
        }
    }

    id
}

/// Derives an edge id from its endpoint ids.
pub fn edge_id(source: &str, target: &str) -> String {
    format!("e-{source}-{target}")
}

/// One visual unit of the diagram: a leaf stage at a fixed position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    id: String,
    name: String,
    steps: Vec<String>,
    position: Point,
    anchor_in: Anchor,
    anchor_out: Anchor,
}

impl LayoutNode {
    /// Creates a node for a stage, placed at `position`.
    ///
    /// The id is derived from `name`; edges enter on the left and leave on
    /// the right.
    pub fn new(name: impl Into<String>, steps: Vec<String>, position: Point) -> Self {
        let name = name.into();
        Self {
            id: node_id(&name),
            name,
            steps,
            position,
            anchor_in: Anchor::Left,
            anchor_out: Anchor::Right,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Returns the side incoming edges attach to.
    pub fn anchor_in(&self) -> Anchor {
        self.anchor_in
    }

    /// Returns the side outgoing edges leave from.
    pub fn anchor_out(&self) -> Anchor {
        self.anchor_out
    }
}

/// A directed connection between two nodes, by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    id: String,
    source: String,
    target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: edge_id(&source, &target),
            source,
            target,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_collapses_whitespace_runs() {
        assert_eq!(node_id("Build"), "stage-Build");
        assert_eq!(node_id("Integration  Tests"), "stage-Integration-Tests");
        assert_eq!(node_id("a\n\tb c"), "stage-a-b-c");
    }

    #[test]
    fn test_node_id_keeps_leading_and_trailing_runs() {
        assert_eq!(node_id(" Deploy "), "stage--Deploy-");
    }

    #[test]
    fn test_node_id_collision() {
        assert_eq!(node_id("a b"), node_id("a   b"));
    }

    #[test]
    fn test_layout_node_anchors() {
        let node = LayoutNode::new("Unit Tests", vec![], Point::new(250.0, 0.0));

        assert_eq!(node.id(), "stage-Unit-Tests");
        assert_eq!(node.name(), "Unit Tests");
        assert_eq!(node.anchor_in(), Anchor::Left);
        assert_eq!(node.anchor_out(), Anchor::Right);
    }

    #[test]
    fn test_edge_id() {
        let edge = Edge::new("stage-Build", "stage-Test");

        assert_eq!(edge.id(), "e-stage-Build-stage-Test");
        assert_eq!(edge.source(), "stage-Build");
        assert_eq!(edge.target(), "stage-Test");
    }

    #[test]
    fn test_layout_node_serialization() {
        let node = LayoutNode::new("Build", vec!["make".to_string()], Point::new(0.0, 0.0));
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["id"], "stage-Build");
        assert_eq!(json["anchorIn"], "left");
        assert_eq!(json["anchorOut"], "right");
        assert_eq!(json["position"]["x"], 0.0);
    }
}

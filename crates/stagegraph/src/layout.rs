//! Stage graph layout.
//!
//! [`LayoutEngine`] turns a stage tree into positioned nodes and the edges
//! between them:
//!
//! - sequential stages advance along +X by `node_width + horizontal_spacing`
//! - the branches of a parallel stage start at the same X and are stacked
//!   along +Y, each `vertical_spacing` below the lowest node of the branch
//!   above it
//! - the stage after a parallel block starts right of the widest branch and
//!   receives one edge from the last node of every branch
//!
//! Parallel stages produce no node of their own.
//!
//! A stage name is placed at most once per layout. Any later stage with the
//! same name, wherever it sits in the tree, is skipped along with
//! everything below it. A skipped branch hands its incoming predecessors
//! straight on to whatever follows the parallel block.

use std::collections::HashSet;

use log::{debug, trace};
use serde::Serialize;

use stagegraph_core::{
    geometry::{Point, Size},
    graph::{Edge, LayoutNode},
    stage::{Stage, StageKind},
};

use crate::config::LayoutConfig;

/// Positioned nodes and edges for one pipeline.
///
/// Nodes are in depth-first visiting order, not sorted by position.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Layout {
    nodes: Vec<LayoutNode>,
    edges: Vec<Edge>,
    #[serde(skip)]
    next_x: f32,
    #[serde(skip)]
    min_y: f32,
    #[serde(skip)]
    max_y: f32,
}

impl Layout {
    /// Returns the placed nodes in visiting order.
    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    /// Returns the edges in the order they were created.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the X a stage appended after the last one would be placed at.
    pub fn next_x(&self) -> f32 {
        self.next_x
    }

    /// Returns the top of the highest node, or the origin's Y if empty.
    pub fn min_y(&self) -> f32 {
        self.min_y
    }

    /// Returns the bottom of the lowest node, or the origin's Y if empty.
    pub fn max_y(&self) -> f32 {
        self.max_y
    }

    /// Returns `true` if nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Finds a node by id.
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }
}

/// Result of placing a run of stages, merged by the caller.
#[derive(Debug)]
struct Placement {
    nodes: Vec<LayoutNode>,
    edges: Vec<Edge>,
    next_x: f32,
    /// Ids of the nodes whose outgoing edges still need a target.
    pending: Vec<String>,
    min_y: f32,
    max_y: f32,
}

impl Placement {
    fn empty(start: Point, pending: Vec<String>) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            next_x: start.x(),
            pending,
            min_y: start.y(),
            max_y: start.y(),
        }
    }

    fn absorb_bounds(&mut self, min_y: f32, max_y: f32) {
        self.min_y = self.min_y.min(min_y);
        self.max_y = self.max_y.max(max_y);
    }
}

/// Lays out stage trees with fixed node size and spacing.
///
/// # Examples
///
/// ```
/// # use stagegraph::{config::LayoutConfig, layout::LayoutEngine};
/// # use stagegraph::stage::Stage;
/// let stages = vec![
///     Stage::leaf("Build", vec!["make".to_string()]),
///     Stage::leaf("Deploy", vec![]),
/// ];
///
/// let layout = LayoutEngine::new(&LayoutConfig::default()).layout(&stages);
///
/// assert_eq!(layout.nodes()[1].position().x(), 250.0);
/// assert_eq!(layout.edges()[0].id(), "e-stage-Build-stage-Deploy");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine {
    node_size: Size,
    horizontal_spacing: f32,
    vertical_spacing: f32,
    origin: Point,
}

impl LayoutEngine {
    /// Create a layout engine from the layout configuration.
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            node_size: config.node_size(),
            horizontal_spacing: config.horizontal_spacing(),
            vertical_spacing: config.vertical_spacing(),
            origin: Point::default(),
        }
    }

    /// Set where the first stage is placed.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Lays out `stages` as a sequence starting at the origin.
    ///
    /// Each call starts with no stage names placed, so laying out the same
    /// tree twice yields identical results.
    pub fn layout(&self, stages: &[Stage]) -> Layout {
        let mut placed = HashSet::new();
        let placement = self.place_sequence(stages, self.origin, Vec::new(), &mut placed);

        debug!(
            nodes = placement.nodes.len(),
            edges = placement.edges.len();
            "Layout calculated"
        );

        Layout {
            nodes: placement.nodes,
            edges: placement.edges,
            next_x: placement.next_x,
            min_y: placement.min_y,
            max_y: placement.max_y,
        }
    }

    /// Places `stages` one after another along +X.
    fn place_sequence(
        &self,
        stages: &[Stage],
        start: Point,
        pending: Vec<String>,
        placed: &mut HashSet<String>,
    ) -> Placement {
        let mut result = Placement::empty(start, pending);
        let y = start.y();

        for stage in stages {
            if !placed.insert(stage.name().to_string()) {
                debug!(stage = stage.name(); "Stage name already placed, skipping");
                continue;
            }

            match stage.kind() {
                StageKind::Parallel => {
                    let position = start.with_x(result.next_x);
                    let branches =
                        self.place_branches(stage.branches(), position, &result.pending, placed);

                    result.nodes.extend(branches.nodes);
                    result.edges.extend(branches.edges);
                    result.pending = branches.pending;
                    result.next_x = branches.next_x;
                    result.absorb_bounds(branches.min_y, branches.max_y);
                }
                StageKind::Leaf => {
                    let position = Point::new(result.next_x, y);
                    let node = LayoutNode::new(stage.name(), stage.steps().to_vec(), position);
                    trace!(node = node.id(), x = position.x(), y = position.y(); "Placed node");

                    result.edges.extend(
                        result
                            .pending
                            .iter()
                            .map(|source| Edge::new(source.as_str(), node.id())),
                    );
                    result.pending = vec![node.id().to_string()];
                    result.absorb_bounds(y, y + self.node_size.height());
                    result.next_x += self.node_size.width() + self.horizontal_spacing;
                    result.nodes.push(node);
                }
            }
        }

        result
    }

    /// Places each branch at `start.x()`, stacking them along +Y.
    ///
    /// Every branch starts from the same `pending` predecessors. The result's
    /// pending ids are the concatenation of every branch's pending ids.
    fn place_branches(
        &self,
        branches: &[Stage],
        start: Point,
        pending: &[String],
        placed: &mut HashSet<String>,
    ) -> Placement {
        let mut result = Placement::empty(start, Vec::new());
        let mut branch_y = start.y();

        for branch in branches {
            let placement = self.place_sequence(
                std::slice::from_ref(branch),
                start.with_y(branch_y),
                pending.to_vec(),
                placed,
            );

            result.nodes.extend(placement.nodes);
            result.edges.extend(placement.edges);
            result.pending.extend(placement.pending);
            result.next_x = result.next_x.max(placement.next_x);
            result.absorb_bounds(placement.min_y, placement.max_y);

            branch_y = placement.max_y + self.vertical_spacing;
        }

        result
    }
}

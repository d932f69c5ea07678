//! The parsed pipeline tree.
//!
//! A [`Stage`] is either a leaf that runs a list of steps or a parallel
//! container whose branches are themselves stages. Trees are built once by
//! the parser and never mutated afterwards.

use serde::Serialize;

/// Distinguishes leaf stages from parallel containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    /// A stage that executes its own steps.
    Leaf,
    /// A stage whose work is split across concurrent branches.
    Parallel,
}

/// A named unit of pipeline work.
///
/// Only one of [`steps`](Stage::steps) and [`branches`](Stage::branches)
/// is ever populated, according to [`kind`](Stage::kind). The two
/// constructors are the only way to build a stage, which keeps that
/// invariant intact.
///
/// # Examples
///
/// ```
/// # use stagegraph_core::stage::{Stage, StageKind};
/// let test = Stage::parallel(
///     "Test",
///     vec![
///         Stage::leaf("Unit Tests", vec!["cargo test".to_string()]),
///         Stage::leaf("Lint", vec![]),
///     ],
/// );
///
/// assert_eq!(test.kind(), StageKind::Parallel);
/// assert!(test.steps().is_empty());
/// assert_eq!(test.branches().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage {
    name: String,
    kind: StageKind,
    steps: Vec<String>,
    branches: Vec<Stage>,
}

impl Stage {
    /// Creates a leaf stage with the given step arguments.
    pub fn leaf(name: impl Into<String>, steps: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: StageKind::Leaf,
            steps,
            branches: Vec::new(),
        }
    }

    /// Creates a parallel stage with the given branches.
    pub fn parallel(name: impl Into<String>, branches: Vec<Stage>) -> Self {
        Self {
            name: name.into(),
            kind: StageKind::Parallel,
            steps: Vec::new(),
            branches,
        }
    }

    /// Returns the stage name as written in the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    /// Returns `true` if this stage is a parallel container.
    pub fn is_parallel(&self) -> bool {
        self.kind == StageKind::Parallel
    }

    /// Returns the step arguments in source order. Empty for parallel stages.
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Returns the branches in declaration order. Empty for leaf stages.
    pub fn branches(&self) -> &[Stage] {
        &self.branches
    }
}

//! Stagegraph Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Stagegraph
//! parser and layout crates. It includes:
//!
//! - **Stages**: The parsed pipeline tree ([`stage::Stage`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Graph**: Positioned nodes and edges handed to renderers ([`graph`] module)

pub mod geometry;
pub mod graph;
pub mod stage;

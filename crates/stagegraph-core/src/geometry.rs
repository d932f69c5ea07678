//! Geometric primitives for pipeline layout.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//!
//! # Coordinate System
//!
//! Stagegraph uses the same coordinate system as SVG and most canvas
//! renderers:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Sequential stages advance along +X, parallel branches stack along +Y.

use serde::Serialize;

/// A 2D point representing the top-left corner of a node.
///
/// # Examples
///
/// ```
/// # use stagegraph_core::geometry::Point;
/// let origin = Point::new(0.0, 80.0);
/// let next = origin.with_x(250.0);
///
/// assert_eq!(next.x(), 250.0);
/// assert_eq!(next.y(), 80.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }
}

/// Represents the dimensions of a node with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_point_with_coordinates() {
        let point = Point::new(1.5, 2.5).with_x(10.0).with_y(-4.0);

        assert!(approx_eq!(f32, point.x(), 10.0));
        assert!(approx_eq!(f32, point.y(), -4.0));
    }

    #[test]
    fn test_point_default_is_origin() {
        assert_eq!(Point::default(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_point_serializes_as_xy_object() {
        let json = serde_json::to_string(&Point::new(250.0, 140.0)).unwrap();
        assert_eq!(json, r#"{"x":250.0,"y":140.0}"#);
    }

    #[test]
    fn test_size_accessors() {
        let size = Size::new(150.0, 60.0);

        assert!(approx_eq!(f32, size.width(), 150.0));
        assert!(approx_eq!(f32, size.height(), 60.0));
    }
}

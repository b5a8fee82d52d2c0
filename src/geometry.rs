//! Pure anchor and edge geometry.
//!
//! Every function here is a pure computation over logical node positions and
//! externally measured boxes. Availability of boxes is the caller's problem:
//! nothing in this module queries a port or fails.

/// A measured on-screen box: viewport origin plus extent, as reported by the
/// measurement port.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A point in logical (tree) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Length and angle of a straight edge between two anchors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeGeometry {
    pub length: f64,
    /// Degrees, from `atan2`.
    pub rotation: f64,
}

/// Bottom-edge anchor of branch `index` out of `count` equal-width slots.
///
/// `count >= 1`: decision-like callers always carry at least one branch
/// before anchor geometry is computed.
pub fn anchor_from_branch(origin: Point, node: &NodeBox, index: usize, count: usize) -> Point {
    Point {
        x: origin.x + ((index as f64 + 0.5) * node.width) / count as f64,
        y: origin.y + node.height,
    }
}

/// The fixed incoming anchor: top center of the node's box.
pub fn anchor_top(origin: Point, node: &NodeBox) -> Point {
    Point {
        x: origin.x + node.width / 2.0,
        y: origin.y,
    }
}

/// Straight-line length and rotation from `source` to `target`.
///
/// A zero-length edge keeps `atan2(0, 0)`'s rotation of 0 degrees; there is
/// no degenerate-case handling beyond that.
pub fn edge_geometry(source: Point, target: Point) -> EdgeGeometry {
    let dx = target.x - source.x;
    let dy = target.y - source.y;
    EdgeGeometry {
        length: dx.hypot(dy),
        rotation: dy.atan2(dx).to_degrees(),
    }
}

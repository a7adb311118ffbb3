//! Types shared by the intersection fill builder.

use bevy::prelude::*;

/// The road cross-section where one curve endpoint meets an intersection.
///
/// Start and end endpoints are stored with opposite orientation so that the
/// sorted edges can be stitched `edge[j-1].left -> edge[j].right` around the
/// whole intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JunctionEdge {
    pub left: Vec3,
    pub right: Vec3,
}

impl JunctionEdge {
    pub fn center(&self) -> Vec3 {
        (self.left + self.right) * 0.5
    }
}

/// The closed outline of one intersection fill, ready for fan triangulation.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionOutline {
    pub center: Vec3,
    /// Junction edges in angular order.
    pub edges: Vec<JunctionEdge>,
    /// Boundary points, `curve_steps + 1` per gap.
    pub boundary: Vec<Vec3>,
}

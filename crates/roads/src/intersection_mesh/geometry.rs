//! Geometry of intersection fills: junction edges, angular ordering,
//! blended boundary arcs and the center fan.

use bevy::prelude::*;

use crate::bezier::quadratic_point;
use crate::config::{AngularReference, DEGENERATE_EPSILON};
use crate::curve::{sample_width, CurveSampler};
use crate::intersection::Junction;
use crate::road_mesh::RoadMesh;

use super::types::JunctionEdge;

/// Cross-section of the road at a junction's endpoint.
///
/// A start endpoint keeps the sampled sides; an end endpoint swaps them, as
/// the curve runs into the intersection there instead of away from it.
pub(crate) fn junction_edge(
    curves: &dyn CurveSampler,
    junction: &Junction,
    half_width: f32,
) -> JunctionEdge {
    let sample = sample_width(curves, junction.curve_index, junction.endpoint_t(), half_width);
    if junction.is_start() {
        JunctionEdge {
            left: sample.left,
            right: sample.right,
        }
    } else {
        JunctionEdge {
            left: sample.right,
            right: sample.left,
        }
    }
}

/// Mean of both end points of every edge.
pub(crate) fn intersection_center(edges: &[JunctionEdge]) -> Vec3 {
    if edges.is_empty() {
        return Vec3::ZERO;
    }
    let sum: Vec3 = edges.iter().map(|e| e.left + e.right).sum();
    sum / (edges.len() * 2) as f32
}

/// Angle in radians from `from` to `to`, negative when the rotation is
/// clockwise about `axis`. Zero-length inputs give 0.
pub(crate) fn signed_angle(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    let denominator = (from.length_squared() * to.length_squared()).sqrt();
    if denominator < DEGENERATE_EPSILON {
        return 0.0;
    }
    let cos = (from.dot(to) / denominator).clamp(-1.0, 1.0);
    let angle = cos.acos();
    if axis.dot(from.cross(to)) < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Direction edge angles are measured from.
pub(crate) fn reference_direction(center: Vec3, reference: AngularReference) -> Vec3 {
    let direction = match reference {
        AngularReference::CenterDirection => center,
        AngularReference::FixedAxis(axis) => axis,
    };
    let direction = direction.normalize_or_zero();
    if direction == Vec3::ZERO {
        Vec3::X
    } else {
        direction
    }
}

/// Order edges by signed angle about +Y around `center`. The sort is stable,
/// so edges at equal angles keep their input order.
pub(crate) fn sort_edges(edges: &mut [JunctionEdge], center: Vec3, reference: AngularReference) {
    let from = reference_direction(center, reference);
    let angle = |edge: &JunctionEdge| {
        let to = (edge.center() - center).normalize_or_zero();
        signed_angle(from, to, Vec3::Y)
    };
    edges.sort_by(|a, b| angle(a).total_cmp(&angle(b)));
}

/// Control point of the fill arc from `a` to `b`: the chord midpoint mirrored
/// through `center`, pulled back toward `center` by `weight`.
pub(crate) fn fill_control_point(a: Vec3, b: Vec3, center: Vec3, weight: f32) -> Vec3 {
    let mid = a.lerp(b, 0.5);
    let mirrored = mid - (center - mid);
    mirrored.lerp(center, weight)
}

/// Closed boundary of the fill: for every gap between consecutive sorted
/// edges, `curve_steps` samples of the blended arc from the previous edge's
/// left point, then the next edge's right point.
pub(crate) fn boundary_loop(
    edges: &[JunctionEdge],
    weights: &[f32],
    center: Vec3,
    curve_steps: u32,
) -> Vec<Vec3> {
    let n = edges.len();
    let mut points = Vec::with_capacity(n * (curve_steps as usize + 1));
    for j in 1..=n {
        let a = edges[j - 1].left;
        let b = edges[j % n].right;
        let control = fill_control_point(a, b, center, weights[j - 1]);
        for k in 0..curve_steps {
            let t = k as f32 / curve_steps as f32;
            points.push(quadratic_point(a, control, b, t));
        }
        points.push(b);
    }
    points
}

/// Fan the boundary from `center`: one triangle per boundary point with three
/// fresh vertices, UVs projected from the ground plane as `(z, x)`.
/// Returns the number of triangles emitted.
pub(crate) fn fan_triangulate(mesh: &mut RoadMesh, center: Vec3, boundary: &[Vec3]) -> usize {
    let len = boundary.len();
    for j in 1..=len {
        let a = boundary[j - 1];
        let b = boundary[j % len];
        let ic = mesh.push_vertex(center, Vec2::new(center.z, center.x));
        let ia = mesh.push_vertex(a, Vec2::new(a.z, a.x));
        let ib = mesh.push_vertex(b, Vec2::new(b.z, b.x));
        mesh.intersection_triangles.extend_from_slice(&[ic, ia, ib]);
    }
    len
}

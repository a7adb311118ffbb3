//! Tests for intersection fill geometry and triangulation.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{AngularReference, RoadConfig};
use crate::intersection::{Intersection, IntersectionRegistry, Junction};
use crate::road_mesh::{RoadMesh, Submesh};
use crate::settings::CurveSettings;
use crate::spline::Knot;
use crate::test_harness::StraightCurves;

use super::geometry::{
    boundary_loop, fan_triangulate, fill_control_point, intersection_center, junction_edge,
    signed_angle, sort_edges,
};
use super::types::JunctionEdge;
use super::{build_intersections_submesh, intersection_outline};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn junction(curve_index: usize, knot_index: usize) -> Junction {
    Junction::new(curve_index, knot_index, Knot::default())
}

fn intersection_of(junctions: &[(usize, usize)]) -> Intersection {
    let mut intersection = Intersection::new();
    for &(curve_index, knot_index) in junctions {
        intersection.push_junction_with_default_weight(junction(curve_index, knot_index));
    }
    intersection
}

/// Curve 0 ends at (8, 0, 0) heading +X, curve 1 starts at (10, 0, 2)
/// heading +Z: an L-shaped corner.
fn corner_curves() -> StraightCurves {
    StraightCurves::new(vec![
        (Vec3::ZERO, Vec3::new(8.0, 0.0, 0.0)),
        (Vec3::new(10.0, 0.0, 2.0), Vec3::new(10.0, 0.0, 12.0)),
    ])
}

fn config_with_steps(curve_steps: u32) -> RoadConfig {
    RoadConfig {
        road_width: 1.0,
        curve_steps,
        ..default()
    }
}

/// Edge whose center lies `radius` from `center` at `angle` (radians,
/// measured in the XZ plane).
fn radial_edge(center: Vec3, angle: f32, radius: f32) -> JunctionEdge {
    let dir = Vec3::new(angle.cos(), 0.0, angle.sin());
    let side = Vec3::new(-dir.z, 0.0, dir.x);
    let mid = center + dir * radius;
    JunctionEdge {
        left: mid + side,
        right: mid - side,
    }
}

fn is_cyclic_rotation(a: &[JunctionEdge], b: &[JunctionEdge]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    if a.is_empty() {
        return true;
    }
    (0..b.len()).any(|offset| (0..a.len()).all(|i| a[i] == b[(i + offset) % b.len()]))
}

// ---------------------------------------------------------------------------
// Junction edges and center
// ---------------------------------------------------------------------------

#[test]
fn test_start_and_end_edges_are_oriented_oppositely() {
    let curves = StraightCurves::new(vec![(Vec3::ZERO, Vec3::new(8.0, 0.0, 0.0))]);
    // Along +X the right side is +Z.
    let start = junction_edge(&curves, &junction(0, 0), 1.0);
    assert!((start.left - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    assert!((start.right - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);

    let end = junction_edge(&curves, &junction(0, 1), 1.0);
    assert!((end.left - Vec3::new(8.0, 0.0, 1.0)).length() < 1e-5);
    assert!((end.right - Vec3::new(8.0, 0.0, -1.0)).length() < 1e-5);
}

#[test]
fn test_center_is_mean_of_edge_points() {
    let curves = corner_curves();
    let edges = [
        junction_edge(&curves, &junction(0, 1), 1.0),
        junction_edge(&curves, &junction(1, 0), 1.0),
    ];
    let center = intersection_center(&edges);
    assert!((center - Vec3::new(9.0, 0.0, 1.0)).length() < 1e-5);
}

// ---------------------------------------------------------------------------
// Angular ordering
// ---------------------------------------------------------------------------

#[test]
fn test_signed_angle_sign_and_degenerate_inputs() {
    // X x Z = -Y, so rotating X toward Z is negative about +Y.
    let angle = signed_angle(Vec3::X, Vec3::Z, Vec3::Y);
    assert!((angle + std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    let angle = signed_angle(Vec3::Z, Vec3::X, Vec3::Y);
    assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    assert_eq!(signed_angle(Vec3::ZERO, Vec3::X, Vec3::Y), 0.0);
    assert_eq!(signed_angle(Vec3::X, Vec3::ZERO, Vec3::Y), 0.0);
}

#[test]
fn test_sort_is_permutation_invariant() {
    let center = Vec3::new(30.0, 0.0, 40.0);
    let angles = [0.3_f32, 1.4, 2.9, -2.2, -0.9];
    let edges: Vec<JunctionEdge> = angles.iter().map(|&a| radial_edge(center, a, 10.0)).collect();

    for reference in [
        AngularReference::CenterDirection,
        AngularReference::FixedAxis(Vec3::X),
    ] {
        let mut expected = edges.clone();
        sort_edges(&mut expected, center, reference);

        for seed in 0..16_u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut shuffled = edges.clone();
            shuffled.shuffle(&mut rng);
            sort_edges(&mut shuffled, center, reference);
            assert!(
                is_cyclic_rotation(&expected, &shuffled),
                "seed {seed} produced a different cyclic order"
            );
        }
    }
}

#[test]
fn test_sort_with_fixed_axis_orders_by_angle() {
    let center = Vec3::ZERO;
    let edges = vec![
        radial_edge(center, 0.5, 5.0),
        radial_edge(center, -1.0, 5.0),
        radial_edge(center, 2.0, 5.0),
    ];
    let mut sorted = edges.clone();
    sort_edges(&mut sorted, center, AngularReference::FixedAxis(Vec3::X));
    // Angle about +Y is the negated XZ-plane angle, so larger XZ angles sort first.
    assert_eq!(sorted, vec![edges[2], edges[0], edges[1]]);
}

#[test]
fn test_sort_at_origin_falls_back_to_x_axis() {
    let edges = vec![radial_edge(Vec3::ZERO, 1.0, 5.0), radial_edge(Vec3::ZERO, -1.0, 5.0)];
    let mut a = edges.clone();
    let mut b = edges.clone();
    sort_edges(&mut a, Vec3::ZERO, AngularReference::CenterDirection);
    sort_edges(&mut b, Vec3::ZERO, AngularReference::FixedAxis(Vec3::X));
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Blend weights
// ---------------------------------------------------------------------------

#[test]
fn test_weight_zero_control_is_reflected_midpoint() {
    let a = Vec3::new(2.0, 0.0, 0.0);
    let b = Vec3::new(0.0, 0.0, 2.0);
    let center = Vec3::new(3.0, 0.0, 3.0);
    let mid = a.lerp(b, 0.5);
    let control = fill_control_point(a, b, center, 0.0);
    assert!((control - (2.0 * mid - center)).length() < 1e-5);
}

#[test]
fn test_weight_one_control_is_center() {
    let a = Vec3::new(2.0, 0.0, 0.0);
    let b = Vec3::new(0.0, 0.0, 2.0);
    let center = Vec3::new(3.0, 0.0, 3.0);
    assert!((fill_control_point(a, b, center, 1.0) - center).length() < 1e-5);
}

#[test]
fn test_arc_midpoint_for_boundary_weights() {
    let e0 = JunctionEdge {
        left: Vec3::new(4.0, 0.0, 0.0),
        right: Vec3::new(4.0, 0.0, -2.0),
    };
    let e1 = JunctionEdge {
        left: Vec3::new(-2.0, 0.0, 4.0),
        right: Vec3::new(0.0, 0.0, 4.0),
    };
    let center = intersection_center(&[e0, e1]);
    let a = e0.left;
    let b = e1.right;
    let mid = a.lerp(b, 0.5);

    // With two steps the second point of the first gap is the arc at t = 0.5,
    // which for a quadratic Bezier is halfway between the chord midpoint and
    // the control point.
    let outward = boundary_loop(&[e0, e1], &[0.0, 0.5], center, 2);
    let reflected = 2.0 * mid - center;
    assert!((outward[1] - (mid + reflected) * 0.5).length() < 1e-4);

    let pinched = boundary_loop(&[e0, e1], &[1.0, 0.5], center, 2);
    assert!((pinched[1] - (mid + center) * 0.5).length() < 1e-4);

    // Pinched arcs sit closer to the center than outward ones.
    assert!(pinched[1].distance(center) < outward[1].distance(center));
}

// ---------------------------------------------------------------------------
// Boundary loop and fan
// ---------------------------------------------------------------------------

#[test]
fn test_boundary_loop_length_and_gap_endpoints() {
    let center = Vec3::new(5.0, 0.0, 5.0);
    let edges: Vec<JunctionEdge> = [0.0_f32, 2.0, 4.0]
        .iter()
        .map(|&a| radial_edge(center, a, 6.0))
        .collect();
    let steps = 5;
    let boundary = boundary_loop(&edges, &[0.5, 0.5, 0.5], center, steps);
    let per_gap = steps as usize + 1;
    assert_eq!(boundary.len(), edges.len() * per_gap);
    for j in 0..edges.len() {
        // Each gap starts at the previous edge's left point and ends at the
        // next edge's right point.
        assert!((boundary[j * per_gap] - edges[j].left).length() < 1e-5);
        assert_eq!(boundary[j * per_gap + steps as usize], edges[(j + 1) % 3].right);
    }
}

#[test]
fn test_fan_emits_one_triangle_per_boundary_point() {
    let boundary = vec![Vec3::X, Vec3::Z, -Vec3::X, -Vec3::Z];
    let mut mesh = RoadMesh::default();
    let triangles = fan_triangulate(&mut mesh, Vec3::ZERO, &boundary);
    assert_eq!(triangles, 4);
    assert_eq!(mesh.triangle_count(Submesh::Intersections), 4);
    assert_eq!(mesh.vertices.len(), 12);
    assert!(mesh.road_triangles.is_empty());
    // Last triangle wraps back to the first boundary point.
    assert_eq!(
        mesh.triangle(Submesh::Intersections, 3),
        Some([Vec3::ZERO, -Vec3::Z, Vec3::X])
    );
}

#[test]
fn test_fan_uvs_are_planar_projection() {
    let boundary = vec![Vec3::new(1.0, 0.0, 2.0), Vec3::new(3.0, 0.0, 4.0)];
    let mut mesh = RoadMesh::default();
    fan_triangulate(&mut mesh, Vec3::new(5.0, 1.0, 6.0), &boundary);
    for (vertex, uv) in mesh.vertices.iter().zip(&mesh.uvs) {
        assert_eq!(*uv, Vec2::new(vertex.z, vertex.x));
    }
}

// ---------------------------------------------------------------------------
// Whole intersections
// ---------------------------------------------------------------------------

#[test]
fn test_two_curve_corner_with_four_steps_emits_ten_triangles() {
    let curves = corner_curves();
    let mut registry = IntersectionRegistry::default();
    registry.add(intersection_of(&[(0, 1), (1, 0)])).unwrap();
    let config = config_with_steps(4);

    let mut mesh = RoadMesh::default();
    build_intersections_submesh(&mut mesh, &curves, &[], &registry, &config);
    assert_eq!(mesh.triangle_count(Submesh::Intersections), 10);

    let center = Vec3::new(9.0, 0.0, 1.0);
    for i in 0..10 {
        let [first, _, _] = mesh.triangle(Submesh::Intersections, i).unwrap();
        assert!((first - center).length() < 1e-5, "triangle {i} starts at {first:?}");
    }
}

#[test]
fn test_triangle_count_is_gaps_times_steps_plus_one() {
    let curves = StraightCurves::new(vec![
        (Vec3::new(-20.0, 0.0, 0.0), Vec3::new(-4.0, 0.0, 0.0)),
        (Vec3::new(4.0, 0.0, 0.0), Vec3::new(20.0, 0.0, 0.0)),
        (Vec3::new(0.0, 0.0, 4.0), Vec3::new(0.0, 0.0, 20.0)),
        (Vec3::new(0.0, 0.0, -20.0), Vec3::new(0.0, 0.0, -4.0)),
    ]);
    let intersection = intersection_of(&[(0, 1), (1, 0), (2, 0), (3, 1)]);
    for steps in [1, 3, 8] {
        let mut registry = IntersectionRegistry::default();
        registry.add(intersection.clone()).unwrap();
        let mut mesh = RoadMesh::default();
        build_intersections_submesh(&mut mesh, &curves, &[], &registry, &config_with_steps(steps));
        assert_eq!(
            mesh.triangle_count(Submesh::Intersections),
            4 * (steps as usize + 1)
        );
    }
}

#[test]
fn test_curve_steps_beyond_index_range_skip_fill() {
    let curves = corner_curves();
    let mut registry = IntersectionRegistry::default();
    registry.add(intersection_of(&[(0, 1), (1, 0)])).unwrap();

    let mut mesh = RoadMesh::default();
    build_intersections_submesh(&mut mesh, &curves, &[], &registry, &config_with_steps(u32::MAX));
    assert!(mesh.vertices.is_empty());
    assert!(mesh.intersection_triangles.is_empty());
}

#[test]
fn test_per_curve_width_is_used_for_edges() {
    let curves = corner_curves();
    let intersection = intersection_of(&[(0, 1), (1, 0)]);
    let settings = [
        CurveSettings {
            curve_index: 0,
            width: 3.0,
            resolution: 4,
        },
        CurveSettings {
            curve_index: 1,
            width: 1.0,
            resolution: 4,
        },
    ];
    let outline =
        intersection_outline(&curves, &settings, &intersection, &config_with_steps(2)).unwrap();
    let widths: Vec<f32> = outline
        .edges
        .iter()
        .map(|e| e.left.distance(e.right) * 0.5)
        .collect();
    assert!(widths.iter().any(|w| (w - 3.0).abs() < 1e-5));
    assert!(widths.iter().any(|w| (w - 1.0).abs() < 1e-5));
}

#[test]
fn test_malformed_intersections_contribute_nothing() {
    let curves = corner_curves();
    let mut registry = IntersectionRegistry::default();
    registry.add(intersection_of(&[(0, 1)])).unwrap();
    let mut mismatched = intersection_of(&[(0, 1), (1, 0)]);
    mismatched.blend_weights.push(0.2);
    registry.add(mismatched).unwrap();
    registry.add(intersection_of(&[(0, 1), (7, 0)])).unwrap();
    let mut nan_weight = intersection_of(&[(0, 1), (1, 0)]);
    nan_weight.blend_weights[0] = f32::NAN;
    registry.add(nan_weight).unwrap();

    let mut mesh = RoadMesh::default();
    build_intersections_submesh(&mut mesh, &curves, &[], &registry, &config_with_steps(4));
    assert!(mesh.intersection_triangles.is_empty());
    assert!(mesh.vertices.is_empty());
}

#[test]
fn test_rebuild_twice_is_identical() {
    let curves = corner_curves();
    let mut registry = IntersectionRegistry::default();
    registry.add(intersection_of(&[(0, 1), (1, 0)])).unwrap();
    let config = config_with_steps(6);

    let build = || {
        let mut mesh = RoadMesh::default();
        build_intersections_submesh(&mut mesh, &curves, &[], &registry, &config);
        mesh
    };
    let first = build();
    let second = build();
    assert_eq!(first.vertices, second.vertices);
    assert_eq!(first.uvs, second.uvs);
    assert_eq!(first.intersection_triangles, second.intersection_triangles);
}

#[test]
fn test_no_nan_for_degenerate_curve() {
    let curves = StraightCurves::new(vec![
        (Vec3::ZERO, Vec3::ZERO),
        (Vec3::new(1.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 5.0)),
    ]);
    let mut registry = IntersectionRegistry::default();
    registry.add(intersection_of(&[(0, 1), (1, 0)])).unwrap();
    let mut mesh = RoadMesh::default();
    build_intersections_submesh(&mut mesh, &curves, &[], &registry, &config_with_steps(3));
    assert_eq!(mesh.triangle_count(Submesh::Intersections), 8);
    assert!(mesh.vertices.iter().all(|v| v.is_finite()));
}

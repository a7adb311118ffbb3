//! Road segment strips: one quad per sampling step along each curve.

use bevy::prelude::*;

use crate::config::UV_DISTANCE_DIVISOR;
use crate::curve::{sample_width, CurveSampler, SampledPoint};
use crate::road_mesh::RoadMesh;
use crate::settings::CurveSettings;

/// Sample `resolution` evenly spaced parameters `i / resolution` plus the
/// closing sample at `t = 1`, giving `resolution + 1` offset pairs.
pub fn sample_curve(curves: &dyn CurveSampler, settings: &CurveSettings) -> Vec<SampledPoint> {
    let resolution = settings.resolution;
    let mut samples = Vec::with_capacity(resolution as usize + 1);
    for i in 0..resolution {
        let t = i as f32 / resolution as f32;
        samples.push(sample_width(curves, settings.curve_index, t, settings.width));
    }
    samples.push(sample_width(curves, settings.curve_index, 1.0, settings.width));
    samples
}

/// Append the quad strip for one curve's samples.
///
/// Each quad gets four fresh vertices `p1, p2, p3, p4` (previous right/left,
/// current right/left) and the triangles `(p1, p3, p4)` and `(p4, p2, p1)`.
/// UV.u is 0 on the right edge and 1 on the left; UV.v grows by a quarter of
/// the right-edge chord length per quad.
pub fn append_curve_strip(mesh: &mut RoadMesh, samples: &[SampledPoint]) {
    let mut uv_offset = 0.0_f32;
    for pair in samples.windows(2) {
        let (p1, p2) = (pair[0].right, pair[0].left);
        let (p3, p4) = (pair[1].right, pair[1].left);

        let distance = p1.distance(p3) / UV_DISTANCE_DIVISOR;
        let uv_next = uv_offset + distance;

        let i1 = mesh.push_vertex(p1, Vec2::new(0.0, uv_offset));
        let i2 = mesh.push_vertex(p2, Vec2::new(1.0, uv_offset));
        let i3 = mesh.push_vertex(p3, Vec2::new(0.0, uv_next));
        let i4 = mesh.push_vertex(p4, Vec2::new(1.0, uv_next));

        mesh.road_triangles.extend_from_slice(&[i1, i3, i4, i4, i2, i1]);
        uv_offset = uv_next;
    }
}

/// Emit road strips for every curve, in curve index order.
pub fn build_road_submesh(
    mesh: &mut RoadMesh,
    curves: &dyn CurveSampler,
    curve_settings: &[CurveSettings],
) {
    for settings in curve_settings {
        let vertex_count = (settings.resolution as usize).saturating_mul(4);
        if !mesh.has_room_for(vertex_count) {
            warn!(
                "Skipping curve {}: resolution {} needs more than u32 vertex indices",
                settings.curve_index, settings.resolution
            );
            continue;
        }
        let samples = sample_curve(curves, settings);
        append_curve_strip(mesh, &samples);
    }
}

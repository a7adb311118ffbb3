//! Intersection fills.
//!
//! Each intersection is filled with a fan around its center. The boundary of
//! the fan walks the junction edges in angular order and bridges every gap
//! between neighbouring edges with a quadratic arc whose bulge is controlled
//! by that gap's blend weight.

mod geometry;
#[cfg(test)]
mod tests;
mod types;

pub use types::{IntersectionOutline, JunctionEdge};

use bevy::prelude::*;

use crate::config::RoadConfig;
use crate::curve::CurveSampler;
use crate::error::RoadError;
use crate::intersection::{Intersection, IntersectionRegistry};
use crate::road_mesh::RoadMesh;
use crate::settings::CurveSettings;

use geometry::{boundary_loop, fan_triangulate, intersection_center, junction_edge, sort_edges};

/// Half-width used for a curve: its recorded setting, or the road default.
fn curve_half_width(curve_settings: &[CurveSettings], curve_index: usize, config: &RoadConfig) -> f32 {
    curve_settings
        .get(curve_index)
        .filter(|s| s.curve_index == curve_index)
        .map(|s| s.width)
        .unwrap_or(config.road_width)
}

/// Compute the sorted edges, center and boundary loop of one intersection.
///
/// Fails for intersections with fewer than two junctions, a weight count that
/// does not match the junction count, or a junction on a missing curve.
pub fn intersection_outline(
    curves: &dyn CurveSampler,
    curve_settings: &[CurveSettings],
    intersection: &Intersection,
    config: &RoadConfig,
) -> Result<IntersectionOutline, RoadError> {
    intersection.validate()?;
    let num_curves = curves.num_curves();
    if let Some(bad) = intersection
        .junctions
        .iter()
        .find(|j| j.curve_index >= num_curves)
    {
        return Err(RoadError::InvalidCurveIndex {
            index: bad.curve_index,
            num_curves,
        });
    }

    let mut edges: Vec<JunctionEdge> = intersection
        .junctions
        .iter()
        .map(|j| {
            let half_width = curve_half_width(curve_settings, j.curve_index, config);
            junction_edge(curves, j, half_width)
        })
        .collect();

    let center = intersection_center(&edges);
    sort_edges(&mut edges, center, config.angular_reference);
    let boundary = boundary_loop(
        &edges,
        &intersection.blend_weights,
        center,
        config.curve_steps.max(1),
    );

    Ok(IntersectionOutline {
        center,
        edges,
        boundary,
    })
}

/// Append the fill of every well-formed intersection to the intersection
/// submesh. Malformed intersections are logged and contribute nothing.
pub fn build_intersections_submesh(
    mesh: &mut RoadMesh,
    curves: &dyn CurveSampler,
    curve_settings: &[CurveSettings],
    intersections: &IntersectionRegistry,
    config: &RoadConfig,
) {
    let steps = config.curve_steps.max(1) as usize;
    for intersection in intersections.iter() {
        let vertex_count = intersection
            .junctions
            .len()
            .saturating_mul(steps.saturating_add(1))
            .saturating_mul(3);
        if !mesh.has_room_for(vertex_count) {
            warn!(
                "Skipping intersection {}: {} curve steps need more than u32 vertex indices",
                intersection.id().0,
                config.curve_steps
            );
            continue;
        }
        match intersection_outline(curves, curve_settings, intersection, config) {
            Ok(outline) => {
                let triangles = fan_triangulate(mesh, outline.center, &outline.boundary);
                debug!(
                    "Intersection {} filled with {} triangles",
                    intersection.id().0,
                    triangles
                );
            }
            Err(err) => warn!("Skipping intersection {}: {}", intersection.id().0, err),
        }
    }
}

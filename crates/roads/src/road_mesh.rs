//! Output buffers of a road rebuild: one vertex/UV buffer shared by two
//! index lists (road segments and intersection fills).

use bevy::prelude::*;

use crate::config::RoadConfig;
use crate::curve::CurveSampler;
use crate::intersection::IntersectionRegistry;
use crate::intersection_mesh::build_intersections_submesh;
use crate::segment_builder::build_road_submesh;
use crate::settings::CurveSettings;

/// Which index list a triangle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Submesh {
    Road = 0,
    Intersections = 1,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoadMesh {
    pub vertices: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub road_triangles: Vec<u32>,
    pub intersection_triangles: Vec<u32>,
}

impl RoadMesh {
    pub fn indices(&self, submesh: Submesh) -> &[u32] {
        match submesh {
            Submesh::Road => &self.road_triangles,
            Submesh::Intersections => &self.intersection_triangles,
        }
    }

    pub fn triangle_count(&self, submesh: Submesh) -> usize {
        self.indices(submesh).len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.road_triangles.is_empty() && self.intersection_triangles.is_empty()
    }

    /// Whether `count` more vertices still get 32-bit indices.
    pub fn has_room_for(&self, count: usize) -> bool {
        self.vertices
            .len()
            .checked_add(count)
            .is_some_and(|total| total <= u32::MAX as usize)
    }

    /// Append a vertex with its UV, returning its index.
    ///
    /// Builders reserve their vertex count with [`Self::has_room_for`] first,
    /// so the index always fits in a `u32`.
    pub(crate) fn push_vertex(&mut self, position: Vec3, uv: Vec2) -> u32 {
        debug_assert!(self.vertices.len() < u32::MAX as usize);
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.uvs.push(uv);
        index
    }

    /// Positions of triangle `triangle` in `submesh`.
    pub fn triangle(&self, submesh: Submesh, triangle: usize) -> Option<[Vec3; 3]> {
        let indices = self.indices(submesh).get(triangle * 3..triangle * 3 + 3)?;
        Some([
            *self.vertices.get(indices[0] as usize)?,
            *self.vertices.get(indices[1] as usize)?,
            *self.vertices.get(indices[2] as usize)?,
        ])
    }
}

/// Build the complete mesh: road segments first, then intersection fills.
///
/// `curve_settings[i]` holds the settings of curve `i`.
pub fn assemble_road_mesh(
    curves: &dyn CurveSampler,
    curve_settings: &[CurveSettings],
    intersections: &IntersectionRegistry,
    config: &RoadConfig,
) -> RoadMesh {
    let mut mesh = RoadMesh::default();
    build_road_submesh(&mut mesh, curves, curve_settings);
    build_intersections_submesh(&mut mesh, curves, curve_settings, intersections, config);
    mesh
}

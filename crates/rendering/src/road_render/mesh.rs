use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use roads::{RoadMesh, Submesh};

/// Convert one submesh of a generated road into a renderable mesh.
///
/// The full vertex and UV buffers are kept so triangle indices stay valid;
/// only the index list differs between the two submeshes. Normals point up.
pub fn road_mesh_to_bevy(road_mesh: &RoadMesh, submesh: Submesh) -> Mesh {
    let positions: Vec<[f32; 3]> = road_mesh.vertices.iter().map(|v| v.to_array()).collect();
    let normals: Vec<[f32; 3]> = vec![[0.0, 1.0, 0.0]; positions.len()];
    let uvs: Vec<[f32; 2]> = road_mesh.uvs.iter().map(|uv| uv.to_array()).collect();
    let indices = road_mesh.indices(submesh).to_vec();

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(indices))
}

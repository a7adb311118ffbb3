mod mesh;

use bevy::prelude::*;

use roads::{SplineRoad, Submesh};

pub use mesh::road_mesh_to_bevy;

/// Marker component for the road segment mesh entity of a road.
#[derive(Component)]
pub struct RoadSegmentMesh {
    pub road: Entity,
}

/// Marker component for the intersection fill mesh entity of a road.
#[derive(Component)]
pub struct RoadIntersectionMesh {
    pub road: Entity,
}

/// Mesh handles a road publishes into, plus the rebuild they show.
#[derive(Component, Debug, Clone)]
pub struct PublishedRoadMesh {
    pub generation: u64,
    pub segments: Handle<Mesh>,
    pub intersections: Handle<Mesh>,
}

/// Shared materials for every road.
#[derive(Resource, Debug, Clone)]
pub struct RoadMaterials {
    pub asphalt: Handle<StandardMaterial>,
    pub intersection: Handle<StandardMaterial>,
}

impl FromWorld for RoadMaterials {
    fn from_world(world: &mut World) -> Self {
        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        let asphalt = materials.add(StandardMaterial {
            base_color: Color::srgb(0.32, 0.32, 0.34),
            perceptual_roughness: 0.9,
            ..default()
        });
        let intersection = materials.add(StandardMaterial {
            base_color: Color::srgb(0.28, 0.28, 0.30),
            perceptual_roughness: 0.9,
            ..default()
        });
        Self {
            asphalt,
            intersection,
        }
    }
}

/// Publish road meshes after a rebuild.
///
/// The first publication spawns one child entity per submesh; later ones
/// overwrite the mesh assets in place. Roads whose rebuild count has not
/// moved since the last publication are skipped.
pub fn sync_road_meshes(
    roads: Query<(Entity, &SplineRoad, Option<&PublishedRoadMesh>), Changed<SplineRoad>>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    materials: Res<RoadMaterials>,
) {
    for (entity, road, published) in &roads {
        let generation = road.rebuild_count();
        if generation == 0 || published.is_some_and(|p| p.generation == generation) {
            continue;
        }
        let segment_mesh = road_mesh_to_bevy(road.mesh(), Submesh::Road);
        let intersection_mesh = road_mesh_to_bevy(road.mesh(), Submesh::Intersections);

        match published {
            Some(published) => {
                meshes.insert(&published.segments, segment_mesh);
                meshes.insert(&published.intersections, intersection_mesh);
                commands.entity(entity).insert(PublishedRoadMesh {
                    generation,
                    ..published.clone()
                });
            }
            None => {
                let segments = meshes.add(segment_mesh);
                let intersections = meshes.add(intersection_mesh);
                commands
                    .entity(entity)
                    .insert_if_new((Transform::IDENTITY, Visibility::default()))
                    .insert(PublishedRoadMesh {
                        generation,
                        segments: segments.clone(),
                        intersections: intersections.clone(),
                    })
                    .with_children(|parent| {
                        parent.spawn((
                            RoadSegmentMesh { road: entity },
                            Mesh3d(segments),
                            MeshMaterial3d(materials.asphalt.clone()),
                            Transform::IDENTITY,
                        ));
                        parent.spawn((
                            RoadIntersectionMesh { road: entity },
                            Mesh3d(intersections),
                            MeshMaterial3d(materials.intersection.clone()),
                            // Slightly above the road surface to avoid z-fighting.
                            Transform::from_xyz(0.0, 0.01, 0.0),
                        ));
                    });
                info!(
                    "Published road mesh for {:?}: {} vertices",
                    entity,
                    road.mesh().vertices.len()
                );
            }
        }
    }
}

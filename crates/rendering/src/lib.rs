use bevy::prelude::*;

pub mod camera;
pub mod road_render;

use roads::RoadSet;

/// Publishes generated road meshes into the scene.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<road_render::RoadMaterials>().add_systems(
            Update,
            road_render::sync_road_meshes.after(RoadSet::Rebuild),
        );
    }
}

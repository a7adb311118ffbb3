use bevy::prelude::*;

pub mod bezier;
pub mod commands;
pub mod config;
pub mod curve;
pub mod error;
pub mod intersection;
pub mod intersection_mesh;
pub mod junction_builder;
pub mod road;
pub mod road_mesh;
pub mod segment_builder;
pub mod settings;
pub mod spline;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use commands::{RoadCommand, RoadCommandEvent};
pub use config::RoadConfig;
pub use curve::{CurveFrame, CurveSampler};
pub use error::RoadError;
pub use road::SplineRoad;
pub use road_mesh::{RoadMesh, Submesh};
pub use spline::SplineContainer;

/// Ordered phases of road upkeep in the `Update` schedule.
///
/// Configured as a chain: `Commands` → `Rebuild`. Systems that consume the
/// generated mesh should run after `RoadSet::Rebuild`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoadSet {
    /// Apply queued `RoadCommandEvent`s.
    Commands,
    /// Rebuild roads after curve edits and for newly spawned roads.
    Rebuild,
}

pub struct RoadsPlugin;

impl Plugin for RoadsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SplineContainer>()
            .add_event::<RoadCommandEvent>()
            .configure_sets(Update, (RoadSet::Commands, RoadSet::Rebuild).chain())
            .add_systems(
                Update,
                commands::apply_road_commands.in_set(RoadSet::Commands),
            )
            .add_systems(
                Update,
                (commands::rebuild_on_curve_change, commands::rebuild_new_roads)
                    .chain()
                    .in_set(RoadSet::Rebuild),
            );
    }
}

use std::path::PathBuf;

use bevy::prelude::*;

use roads::commands::apply_road_commands;
use roads::{RoadSet, SplineContainer, SplineRoad};

use crate::save_codec::{load_road_from_file, save_road_to_file};
use crate::save_error::SaveError;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Write the state of `road` to `path`.
#[derive(Event, Debug, Clone)]
pub struct SaveRoadEvent {
    pub road: Entity,
    pub path: PathBuf,
    /// LZ4 compress the payload.
    pub compress: bool,
}

/// Replace the state of `road` with the contents of `path` and rebuild it.
#[derive(Event, Debug, Clone)]
pub struct LoadRoadEvent {
    pub road: Entity,
    pub path: PathBuf,
}

/// Outcome of a save or load request.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum RoadFileEvent {
    Saved { road: Entity, path: PathBuf },
    Loaded { road: Entity, path: PathBuf },
    Failed { road: Entity, message: String },
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Saves and loads run after the frame's road commands, so a file written
/// in a frame holds that frame's edits and a load overrides them.
pub struct RoadSavePlugin;

impl Plugin for RoadSavePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SaveRoadEvent>()
            .add_event::<LoadRoadEvent>()
            .add_event::<RoadFileEvent>()
            .add_systems(
                Update,
                (handle_save_events, handle_load_events)
                    .chain()
                    .after(apply_road_commands)
                    .in_set(RoadSet::Commands),
            );
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

fn handle_save_events(
    mut events: EventReader<SaveRoadEvent>,
    roads: Query<&SplineRoad>,
    mut results: EventWriter<RoadFileEvent>,
) {
    for event in events.read() {
        let outcome = roads
            .get(event.road)
            .map_err(|_| SaveError::NoData)
            .and_then(|road| save_road_to_file(road, &event.path, event.compress));
        match outcome {
            Ok(()) => {
                info!("Saved road {:?} to {}", event.road, event.path.display());
                results.send(RoadFileEvent::Saved {
                    road: event.road,
                    path: event.path.clone(),
                });
            }
            Err(e) => {
                let message = format!("Save failed: {e}");
                error!("{message}");
                results.send(RoadFileEvent::Failed {
                    road: event.road,
                    message,
                });
            }
        }
    }
}

fn handle_load_events(
    mut events: EventReader<LoadRoadEvent>,
    mut roads: Query<&mut SplineRoad>,
    container: Res<SplineContainer>,
    mut results: EventWriter<RoadFileEvent>,
) {
    for event in events.read() {
        let outcome = roads
            .get_mut(event.road)
            .map_err(|_| SaveError::NoData)
            .and_then(|road| load_road_from_file(&event.path).map(|loaded| (road, loaded)));
        match outcome {
            Ok((mut road, loaded)) => {
                road.restore(&*container, loaded);
                info!("Loaded road {:?} from {}", event.road, event.path.display());
                results.send(RoadFileEvent::Loaded {
                    road: event.road,
                    path: event.path.clone(),
                });
            }
            Err(e) => {
                let message = format!("Load failed: {e}");
                error!("{message}");
                results.send(RoadFileEvent::Failed {
                    road: event.road,
                    message,
                });
            }
        }
    }
}

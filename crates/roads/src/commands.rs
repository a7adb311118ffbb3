//! Edit commands and the systems that keep every road's mesh current.
//!
//! Edits arrive as [`RoadCommandEvent`]s and are applied in order, each one
//! followed by a synchronous rebuild of the targeted road. Curve edits are
//! picked up through change detection on [`SplineContainer`].

use bevy::prelude::*;

use crate::config::RoadConfig;
use crate::intersection::IntersectionId;
use crate::junction_builder::{build_junction, KnotRef};
use crate::road::SplineRoad;
use crate::spline::{Axis, SplineContainer};

/// A single edit to a road.
#[derive(Debug, Clone, PartialEq)]
pub enum RoadCommand {
    SetWidth {
        curve_index: usize,
        width: f32,
    },
    SetResolution {
        curve_index: usize,
        resolution: u32,
    },
    SetBlendWeight {
        intersection: IntersectionId,
        gap: usize,
        weight: f32,
    },
    /// Join the selected curve endpoints into a new intersection.
    BuildJunction {
        selection: Vec<KnotRef>,
    },
    RemoveIntersection(IntersectionId),
    ClearIntersections,
    SetConfig(RoadConfig),
    /// Align every knot of the shared spline container to an axis. All roads
    /// rebuild through the curve-change path.
    AlignKnots(Axis),
}

#[derive(Event, Debug, Clone)]
pub struct RoadCommandEvent {
    pub road: Entity,
    pub command: RoadCommand,
}

impl RoadCommandEvent {
    pub fn new(road: Entity, command: RoadCommand) -> Self {
        Self { road, command }
    }
}

/// Apply queued road commands in the order they were sent.
pub fn apply_road_commands(
    mut events: EventReader<RoadCommandEvent>,
    mut roads: Query<&mut SplineRoad>,
    mut container: ResMut<SplineContainer>,
) {
    for event in events.read() {
        if let RoadCommand::AlignKnots(axis) = event.command {
            container.align_knots_to_axis(axis);
            continue;
        }

        let Ok(mut road) = roads.get_mut(event.road) else {
            warn!("Road command for missing road entity {:?}", event.road);
            continue;
        };
        let curves: &SplineContainer = &container;

        let result = match &event.command {
            RoadCommand::SetWidth { curve_index, width } => {
                road.set_width(curves, *curve_index, *width)
            }
            RoadCommand::SetResolution {
                curve_index,
                resolution,
            } => road.set_resolution(curves, *curve_index, *resolution),
            RoadCommand::SetBlendWeight {
                intersection,
                gap,
                weight,
            } => road.set_blend_weight(curves, *intersection, *gap, *weight),
            RoadCommand::BuildJunction { selection } => build_junction(curves, selection)
                .and_then(|intersection| road.add_intersection(curves, intersection))
                .map(|id| info!("Built intersection {} from {} knots", id.0, selection.len())),
            RoadCommand::RemoveIntersection(id) => road.remove_intersection(curves, *id).map(|_| ()),
            RoadCommand::ClearIntersections => {
                let removed = road.clear_intersections(curves);
                info!("Cleared {} intersections", removed);
                Ok(())
            }
            RoadCommand::SetConfig(config) => {
                road.set_config(curves, *config);
                Ok(())
            }
            RoadCommand::AlignKnots(_) => Ok(()),
        };

        if let Err(err) = result {
            warn!("Road command {:?} rejected: {}", event.command, err);
        }
    }
}

/// Rebuild every road when the curves they are generated from change.
pub fn rebuild_on_curve_change(
    container: Res<SplineContainer>,
    mut roads: Query<&mut SplineRoad>,
) {
    if !container.is_changed() {
        return;
    }
    for mut road in &mut roads {
        road.rebuild(container.as_ref());
    }
}

/// Build the first mesh of newly spawned roads.
pub fn rebuild_new_roads(
    container: Res<SplineContainer>,
    mut roads: Query<&mut SplineRoad, Added<SplineRoad>>,
) {
    // Already covered by the curve-change rebuild this frame.
    if container.is_changed() {
        return;
    }
    for mut road in &mut roads {
        road.rebuild(container.as_ref());
    }
}

//! # Test harness for road generation
//!
//! Simple curve samplers for geometry tests plus [`TestRoad`], a headless
//! Bevy app running `RoadsPlugin` with a single road entity.

use bevy::app::App;
use bevy::prelude::*;

use crate::commands::{RoadCommand, RoadCommandEvent};
use crate::config::RoadConfig;
use crate::curve::{CurveFrame, CurveSampler};
use crate::road::SplineRoad;
use crate::spline::{Spline, SplineContainer};
use crate::RoadsPlugin;

// ---------------------------------------------------------------------------
// Samplers
// ---------------------------------------------------------------------------

/// Straight curves with a constant tangent `end - start` and up +Y.
#[derive(Debug, Clone, Default)]
pub struct StraightCurves {
    pub lines: Vec<(Vec3, Vec3)>,
}

impl StraightCurves {
    pub fn new(lines: Vec<(Vec3, Vec3)>) -> Self {
        Self { lines }
    }
}

impl CurveSampler for StraightCurves {
    fn num_curves(&self) -> usize {
        self.lines.len()
    }

    fn evaluate(&self, curve_index: usize, t: f32) -> CurveFrame {
        let (start, end) = self.lines[curve_index];
        CurveFrame {
            position: start.lerp(end, t),
            tangent: end - start,
            up: Vec3::Y,
        }
    }
}

/// One curve that returns the same frame for every parameter.
#[derive(Debug, Clone, Copy)]
pub struct FixedFrameCurves(pub CurveFrame);

impl CurveSampler for FixedFrameCurves {
    fn num_curves(&self) -> usize {
        1
    }

    fn evaluate(&self, _curve_index: usize, _t: f32) -> CurveFrame {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Headless app
// ---------------------------------------------------------------------------

pub struct TestRoad {
    app: App,
    road: Entity,
}

impl TestRoad {
    /// App with `splines` in the container and one road using the default
    /// config. Runs one update so the initial mesh is built.
    pub fn new(splines: Vec<Spline>) -> Self {
        Self::with_config(splines, RoadConfig::default())
    }

    pub fn with_config(splines: Vec<Spline>, config: RoadConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(RoadsPlugin);
        app.insert_resource(SplineContainer::new(splines));
        let road = app.world_mut().spawn(SplineRoad::new(config)).id();
        app.update();
        Self { app, road }
    }

    pub fn entity(&self) -> Entity {
        self.road
    }

    /// Queue a command for the road; it is applied on the next `tick`.
    pub fn send(&mut self, command: RoadCommand) -> &mut Self {
        self.app
            .world_mut()
            .send_event(RoadCommandEvent::new(self.road, command));
        self
    }

    pub fn tick(&mut self) -> &mut Self {
        self.app.update();
        self
    }

    pub fn road(&self) -> &SplineRoad {
        self.app
            .world()
            .get::<SplineRoad>(self.road)
            .expect("test road entity has no SplineRoad")
    }

    pub fn container(&self) -> &SplineContainer {
        self.app.world().resource::<SplineContainer>()
    }

    pub fn container_mut(&mut self) -> Mut<'_, SplineContainer> {
        self.app.world_mut().resource_mut::<SplineContainer>()
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

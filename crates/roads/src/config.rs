use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Half-width offset applied on each side of the centerline for new curves.
pub const DEFAULT_ROAD_WIDTH: f32 = 4.0;

/// Number of quads emitted along a curve for new curves.
pub const DEFAULT_ROAD_RESOLUTION: u32 = 16;

/// Samples taken along each intersection fill arc (excluding the arc's end point).
pub const DEFAULT_CURVE_STEPS: u32 = 8;

/// Blend weight assigned to every gap of a freshly built junction.
pub const DEFAULT_BLEND_WEIGHT: f32 = 0.5;

/// Chord length is divided by this to get the road UV.v increment.
pub const UV_DISTANCE_DIVISOR: f32 = 4.0;

/// Squared length below which an offset direction is considered degenerate.
pub const DEGENERATE_EPSILON: f32 = 1e-10;

/// Reference direction used to order junction edges around an intersection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum AngularReference {
    /// Angle measured from the normalized intersection center (its direction
    /// from the world origin). Falls back to +X when the center is the origin.
    #[default]
    CenterDirection,
    /// Angle measured from a fixed world-space axis.
    FixedAxis(Vec3),
}

/// Road-wide defaults. Per-curve width and resolution overrides start from
/// `road_width` / `road_resolution` the first time a curve is touched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadConfig {
    pub road_width: f32,
    pub road_resolution: u32,
    pub curve_steps: u32,
    pub angular_reference: AngularReference,
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            road_width: DEFAULT_ROAD_WIDTH,
            road_resolution: DEFAULT_ROAD_RESOLUTION,
            curve_steps: DEFAULT_CURVE_STEPS,
            angular_reference: AngularReference::CenterDirection,
        }
    }
}

impl RoadConfig {
    /// Clamp values into their valid ranges: width is non-negative and at
    /// least one step is taken along every fill arc.
    pub fn sanitized(self) -> Self {
        Self {
            road_width: if self.road_width.is_finite() {
                self.road_width.max(0.0)
            } else {
                DEFAULT_ROAD_WIDTH
            },
            curve_steps: self.curve_steps.max(1),
            ..self
        }
    }

    /// Parse a config from JSON, missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RoadConfig>(json).map(RoadConfig::sanitized)
    }
}

// ---------------------------------------------------------------------------
// Save structs and version constants
// ---------------------------------------------------------------------------

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Current road save schema version.
/// v1 = config, per-curve settings, intersections with knot snapshots
pub const CURRENT_SAVE_VERSION: u32 = 1;

// Angular reference tags stored in `SaveRoadConfig::angular_reference`.
pub const ANGULAR_REFERENCE_CENTER: u8 = 0;
pub const ANGULAR_REFERENCE_FIXED_AXIS: u8 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveRoadConfig {
    pub road_width: f32,
    pub road_resolution: u32,
    pub curve_steps: u32,
    pub angular_reference: u8,
    /// Only meaningful when `angular_reference` is the fixed-axis tag.
    pub fixed_axis: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveCurveSettings {
    pub curve_index: u32,
    pub width: f32,
    pub resolution: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveKnot {
    pub position: [f32; 3],
    pub tangent_in: [f32; 3],
    pub tangent_out: [f32; 3],
    pub up: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveJunction {
    pub curve_index: u32,
    pub knot_index: u32,
    pub knot: SaveKnot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveIntersection {
    pub id: u32,
    pub junctions: Vec<SaveJunction>,
    pub blend_weights: Vec<f32>,
}

/// Everything needed to restore a `SplineRoad`. The mesh is not stored; it is
/// regenerated from the curves after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveRoad {
    pub version: u32,
    pub config: SaveRoadConfig,
    /// In the order they were recorded.
    pub settings: Vec<SaveCurveSettings>,
    pub intersections: Vec<SaveIntersection>,
    pub next_intersection_id: u32,
}

// ---------------------------------------------------------------------------
// Road <-> save struct conversion and the file codec
// ---------------------------------------------------------------------------

use std::path::Path;

use bevy::prelude::*;

use roads::config::{AngularReference, RoadConfig};
use roads::intersection::{Intersection, IntersectionId, IntersectionRegistry, Junction};
use roads::settings::{CurveSettings, CurveSettingsStore};
use roads::spline::Knot;
use roads::SplineRoad;

use crate::atomic_write::atomic_write;
use crate::file_header::{unwrap_header, wrap_with_header, FLAG_COMPRESSED};
use crate::save_error::SaveError;
use crate::save_types::*;

fn index_to_u32(index: usize, what: &str) -> Result<u32, SaveError> {
    u32::try_from(index).map_err(|_| SaveError::Encode(format!("{what} {index} does not fit in u32")))
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn save_config(config: &RoadConfig) -> SaveRoadConfig {
    let (angular_reference, fixed_axis) = match config.angular_reference {
        AngularReference::CenterDirection => (ANGULAR_REFERENCE_CENTER, [0.0; 3]),
        AngularReference::FixedAxis(axis) => (ANGULAR_REFERENCE_FIXED_AXIS, axis.to_array()),
    };
    SaveRoadConfig {
        road_width: config.road_width,
        road_resolution: config.road_resolution,
        curve_steps: config.curve_steps,
        angular_reference,
        fixed_axis,
    }
}

fn restore_config(save: &SaveRoadConfig) -> RoadConfig {
    let angular_reference = match save.angular_reference {
        ANGULAR_REFERENCE_FIXED_AXIS => AngularReference::FixedAxis(Vec3::from_array(save.fixed_axis)),
        _ => AngularReference::CenterDirection,
    };
    RoadConfig {
        road_width: save.road_width,
        road_resolution: save.road_resolution,
        curve_steps: save.curve_steps,
        angular_reference,
    }
    .sanitized()
}

// ---------------------------------------------------------------------------
// Intersections
// ---------------------------------------------------------------------------

fn save_knot(knot: &Knot) -> SaveKnot {
    SaveKnot {
        position: knot.position.to_array(),
        tangent_in: knot.tangent_in.to_array(),
        tangent_out: knot.tangent_out.to_array(),
        up: knot.up.to_array(),
    }
}

fn restore_knot(save: &SaveKnot) -> Knot {
    Knot {
        position: Vec3::from_array(save.position),
        tangent_in: Vec3::from_array(save.tangent_in),
        tangent_out: Vec3::from_array(save.tangent_out),
        up: Vec3::from_array(save.up),
    }
}

fn save_intersection(intersection: &Intersection) -> Result<SaveIntersection, SaveError> {
    let junctions = intersection
        .junctions
        .iter()
        .map(|j| {
            Ok(SaveJunction {
                curve_index: index_to_u32(j.curve_index, "curve index")?,
                knot_index: index_to_u32(j.knot_index, "knot index")?,
                knot: save_knot(&j.knot),
            })
        })
        .collect::<Result<Vec<_>, SaveError>>()?;
    Ok(SaveIntersection {
        id: intersection.id().0,
        junctions,
        blend_weights: intersection.blend_weights.clone(),
    })
}

fn restore_intersection(save: &SaveIntersection) -> Result<Intersection, SaveError> {
    let junctions = save
        .junctions
        .iter()
        .map(|j| Junction::new(j.curve_index as usize, j.knot_index as usize, restore_knot(&j.knot)))
        .collect();
    let intersection = Intersection::with_id(
        IntersectionId(save.id),
        junctions,
        save.blend_weights.clone(),
    );
    intersection.validate()?;
    Ok(intersection)
}

// ---------------------------------------------------------------------------
// Road
// ---------------------------------------------------------------------------

impl SaveRoad {
    pub fn from_road(road: &SplineRoad) -> Result<Self, SaveError> {
        let settings = road
            .settings()
            .iter()
            .map(|s| {
                Ok(SaveCurveSettings {
                    curve_index: index_to_u32(s.curve_index, "curve index")?,
                    width: s.width,
                    resolution: s.resolution,
                })
            })
            .collect::<Result<Vec<_>, SaveError>>()?;
        let intersections = road
            .intersections()
            .iter()
            .map(save_intersection)
            .collect::<Result<Vec<_>, SaveError>>()?;
        Ok(Self {
            version: CURRENT_SAVE_VERSION,
            config: save_config(road.config()),
            settings,
            intersections,
            next_intersection_id: road.intersections().next_id(),
        })
    }

    /// Restore the road. Its mesh stays empty until the next rebuild.
    pub fn into_road(self) -> Result<SplineRoad, SaveError> {
        if self.version > CURRENT_SAVE_VERSION {
            return Err(SaveError::VersionMismatch {
                expected_max: CURRENT_SAVE_VERSION,
                found: self.version,
            });
        }
        let settings = CurveSettingsStore::from_snapshot(self.settings.iter().map(|s| {
            CurveSettings {
                curve_index: s.curve_index as usize,
                width: s.width,
                resolution: s.resolution,
            }
        }));
        let intersections = self
            .intersections
            .iter()
            .map(restore_intersection)
            .collect::<Result<Vec<_>, SaveError>>()?;
        Ok(SplineRoad::from_parts(
            restore_config(&self.config),
            settings,
            IntersectionRegistry::from_parts(intersections, self.next_intersection_id)?,
        ))
    }
}

// ---------------------------------------------------------------------------
// Bytes and files
// ---------------------------------------------------------------------------

/// Encode a road into header-wrapped bytes, optionally LZ4 compressed.
pub fn encode_road(road: &SplineRoad, compress: bool) -> Result<Vec<u8>, SaveError> {
    let encoded = bitcode::encode(&SaveRoad::from_road(road)?);
    let uncompressed_size = u32::try_from(encoded.len())
        .map_err(|_| SaveError::Encode(format!("encoded road is {} bytes", encoded.len())))?;
    if compress {
        let payload = lz4_flex::compress_prepend_size(&encoded);
        Ok(wrap_with_header(&payload, FLAG_COMPRESSED, uncompressed_size))
    } else {
        Ok(wrap_with_header(&encoded, 0, uncompressed_size))
    }
}

/// Decode bytes produced by [`encode_road`].
pub fn decode_road(bytes: &[u8]) -> Result<SplineRoad, SaveError> {
    let (header, payload) = unwrap_header(bytes)?;
    let decompressed;
    let encoded = if header.is_compressed() {
        decompressed = lz4_flex::decompress_size_prepended(payload)?;
        decompressed.as_slice()
    } else {
        payload
    };
    if encoded.len() != header.uncompressed_size as usize {
        return Err(SaveError::CorruptHeader(format!(
            "payload is {} bytes, header records {}",
            encoded.len(),
            header.uncompressed_size
        )));
    }
    let save: SaveRoad = bitcode::decode(encoded)?;
    save.into_road()
}

pub fn save_road_to_file(road: &SplineRoad, path: &Path, compress: bool) -> Result<(), SaveError> {
    let bytes = encode_road(road, compress)?;
    atomic_write(path, &bytes)?;
    Ok(())
}

pub fn load_road_from_file(path: &Path) -> Result<SplineRoad, SaveError> {
    let bytes = std::fs::read(path)?;
    decode_road(&bytes)
}

//! Per-curve width/resolution overrides.
//!
//! Entries are created lazily the first time a curve is touched, seeded from
//! the road's global defaults at that moment. The in-memory structure is an
//! ordered map; persistence goes through [`CurveSettingsStore::snapshot`] and
//! [`CurveSettingsStore::from_snapshot`].

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::RoadConfig;
use crate::error::RoadError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSettings {
    pub curve_index: usize,
    /// Offset from the centerline to each road edge.
    pub width: f32,
    /// Number of quads emitted along the curve.
    pub resolution: u32,
}

/// Widths are finite and non-negative; anything else collapses to 0.
pub fn sanitize_width(width: f32) -> f32 {
    if width.is_finite() {
        width.max(0.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveSettingsStore {
    entries: BTreeMap<usize, CurveSettings>,
}

impl CurveSettingsStore {
    /// Rebuild the lookup map from a persisted sequence. When a curve index
    /// appears more than once the first record wins. Widths are sanitized.
    pub fn from_snapshot(records: impl IntoIterator<Item = CurveSettings>) -> Self {
        let mut entries = BTreeMap::new();
        for record in records {
            if entries.contains_key(&record.curve_index) {
                warn!(
                    "Duplicate settings record for curve {}, keeping the first",
                    record.curve_index
                );
                continue;
            }
            entries.insert(
                record.curve_index,
                CurveSettings {
                    width: sanitize_width(record.width),
                    ..record
                },
            );
        }
        Self { entries }
    }

    /// Ordered `(curve_index, width, resolution)` records for persistence.
    pub fn snapshot(&self) -> Vec<CurveSettings> {
        self.entries.values().copied().collect()
    }

    pub fn get(&self, curve_index: usize) -> Option<&CurveSettings> {
        self.entries.get(&curve_index)
    }

    /// Look up the settings of `curve_index`, recording a default entry from
    /// `config` if the curve has none yet.
    pub fn get_or_create(
        &mut self,
        curve_index: usize,
        num_curves: usize,
        config: &RoadConfig,
    ) -> Result<&mut CurveSettings, RoadError> {
        if curve_index >= num_curves {
            return Err(RoadError::InvalidCurveIndex {
                index: curve_index,
                num_curves,
            });
        }
        Ok(self
            .entries
            .entry(curve_index)
            .or_insert_with(|| CurveSettings {
                curve_index,
                width: config.road_width,
                resolution: config.road_resolution,
            }))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CurveSettings> {
        self.entries.values()
    }
}

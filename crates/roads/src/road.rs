//! The road entity: owns per-curve settings, intersections and the last
//! generated mesh. Every edit mutates state and rebuilds the whole mesh before
//! returning; rejected edits leave the road untouched.

use bevy::prelude::*;

use crate::config::RoadConfig;
use crate::curve::CurveSampler;
use crate::error::RoadError;
use crate::intersection::{Intersection, IntersectionId, IntersectionRegistry};
use crate::road_mesh::{assemble_road_mesh, RoadMesh, Submesh};
use crate::settings::{sanitize_width, CurveSettings, CurveSettingsStore};

#[derive(Component, Debug, Clone, Default)]
pub struct SplineRoad {
    config: RoadConfig,
    settings: CurveSettingsStore,
    intersections: IntersectionRegistry,
    mesh: RoadMesh,
    rebuild_count: u64,
}

impl SplineRoad {
    pub fn new(config: RoadConfig) -> Self {
        Self {
            config: config.sanitized(),
            ..default()
        }
    }

    /// Restore a road from persisted state. The mesh is empty until the next
    /// rebuild.
    pub fn from_parts(
        config: RoadConfig,
        settings: CurveSettingsStore,
        intersections: IntersectionRegistry,
    ) -> Self {
        Self {
            config: config.sanitized(),
            settings,
            intersections,
            ..default()
        }
    }

    pub fn config(&self) -> &RoadConfig {
        &self.config
    }

    pub fn settings(&self) -> &CurveSettingsStore {
        &self.settings
    }

    pub fn intersections(&self) -> &IntersectionRegistry {
        &self.intersections
    }

    pub fn mesh(&self) -> &RoadMesh {
        &self.mesh
    }

    /// Number of rebuilds since the road was created.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    // -----------------------------------------------------------------------
    // Rebuild
    // -----------------------------------------------------------------------

    /// Regenerate the mesh from scratch. Settings entries are materialized
    /// for every curve the sampler currently has.
    pub fn rebuild(&mut self, curves: &dyn CurveSampler) {
        let num_curves = curves.num_curves();
        let mut curve_settings: Vec<CurveSettings> = Vec::with_capacity(num_curves);
        for curve_index in 0..num_curves {
            if let Ok(settings) = self
                .settings
                .get_or_create(curve_index, num_curves, &self.config)
            {
                curve_settings.push(*settings);
            }
        }

        self.mesh = assemble_road_mesh(curves, &curve_settings, &self.intersections, &self.config);
        self.rebuild_count += 1;
        debug!(
            "Road rebuilt: {} curves, {} intersections, {} road triangles, {} fill triangles",
            num_curves,
            self.intersections.len(),
            self.mesh.triangle_count(Submesh::Road),
            self.mesh.triangle_count(Submesh::Intersections),
        );
    }

    /// Replace config, settings and intersections with those of `loaded`,
    /// then rebuild. The rebuild counter keeps counting up.
    pub fn restore(&mut self, curves: &dyn CurveSampler, loaded: SplineRoad) {
        self.config = loaded.config;
        self.settings = loaded.settings;
        self.intersections = loaded.intersections;
        self.rebuild(curves);
    }

    // -----------------------------------------------------------------------
    // Per-curve settings
    // -----------------------------------------------------------------------

    /// Settings of a curve, recording the road defaults for it on first access.
    pub fn get_settings(
        &mut self,
        curves: &dyn CurveSampler,
        curve_index: usize,
    ) -> Result<CurveSettings, RoadError> {
        self.settings
            .get_or_create(curve_index, curves.num_curves(), &self.config)
            .copied()
    }

    pub fn set_width(
        &mut self,
        curves: &dyn CurveSampler,
        curve_index: usize,
        width: f32,
    ) -> Result<(), RoadError> {
        let settings = self
            .settings
            .get_or_create(curve_index, curves.num_curves(), &self.config)?;
        settings.width = sanitize_width(width);
        self.rebuild(curves);
        Ok(())
    }

    pub fn set_resolution(
        &mut self,
        curves: &dyn CurveSampler,
        curve_index: usize,
        resolution: u32,
    ) -> Result<(), RoadError> {
        let settings = self
            .settings
            .get_or_create(curve_index, curves.num_curves(), &self.config)?;
        settings.resolution = resolution;
        self.rebuild(curves);
        Ok(())
    }

    /// Replace the road-wide defaults. Rebuilds only when a value changed;
    /// returns whether it did.
    pub fn set_config(&mut self, curves: &dyn CurveSampler, config: RoadConfig) -> bool {
        let config = config.sanitized();
        if config == self.config {
            return false;
        }
        self.config = config;
        self.rebuild(curves);
        true
    }

    // -----------------------------------------------------------------------
    // Intersections
    // -----------------------------------------------------------------------

    pub fn add_intersection(
        &mut self,
        curves: &dyn CurveSampler,
        intersection: Intersection,
    ) -> Result<IntersectionId, RoadError> {
        intersection.validate()?;
        let id = self.intersections.add(intersection)?;
        self.rebuild(curves);
        Ok(id)
    }

    pub fn remove_intersection(
        &mut self,
        curves: &dyn CurveSampler,
        id: IntersectionId,
    ) -> Result<Intersection, RoadError> {
        let removed = self
            .intersections
            .remove(id)
            .ok_or(RoadError::UnknownIntersection(id))?;
        self.rebuild(curves);
        Ok(removed)
    }

    /// Remove every intersection, returning how many were removed.
    pub fn clear_intersections(&mut self, curves: &dyn CurveSampler) -> usize {
        let removed = self.intersections.clear();
        self.rebuild(curves);
        removed
    }

    pub fn find_intersection(&self, curve_index: usize, knot_index: usize) -> Option<&Intersection> {
        self.intersections.find_by_junction(curve_index, knot_index)
    }

    pub fn set_blend_weight(
        &mut self,
        curves: &dyn CurveSampler,
        id: IntersectionId,
        gap: usize,
        weight: f32,
    ) -> Result<(), RoadError> {
        self.intersections
            .get_mut(id)
            .ok_or(RoadError::UnknownIntersection(id))?
            .set_blend_weight(gap, weight)?;
        self.rebuild(curves);
        Ok(())
    }
}

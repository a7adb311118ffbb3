//! Declared intersections: clusters of curve endpoints that get merged into
//! one blended fill, plus the registry a road keeps them in.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_BLEND_WEIGHT;
use crate::error::RoadError;
use crate::spline::Knot;

/// Stable handle of an intersection within one road.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct IntersectionId(pub u32);

/// One curve endpoint participating in an intersection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Junction {
    pub curve_index: usize,
    /// 0 for the curve start, the last knot index for its end.
    pub knot_index: usize,
    /// The knot as it was when the junction was built.
    pub knot: Knot,
}

impl Junction {
    pub fn new(curve_index: usize, knot_index: usize, knot: Knot) -> Self {
        Self {
            curve_index,
            knot_index,
            knot,
        }
    }

    pub fn is_start(&self) -> bool {
        self.knot_index == 0
    }

    /// Curve parameter of this endpoint.
    pub fn endpoint_t(&self) -> f32 {
        if self.is_start() {
            0.0
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Intersection {
    id: IntersectionId,
    pub junctions: Vec<Junction>,
    /// `blend_weights[i]` shapes the fill arc between sorted junction `i` and
    /// `i + 1` (cyclic).
    pub blend_weights: Vec<f32>,
}

/// Blend weights live in `[0, 1]`; NaN falls back to the default weight.
fn sanitize_blend_weight(weight: f32) -> f32 {
    if weight.is_nan() {
        DEFAULT_BLEND_WEIGHT
    } else {
        weight.clamp(0.0, 1.0)
    }
}

impl Intersection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an intersection with a known id (used when loading). Weights
    /// are sanitized like [`Intersection::set_blend_weight`] does.
    pub fn with_id(id: IntersectionId, junctions: Vec<Junction>, blend_weights: Vec<f32>) -> Self {
        Self {
            id,
            junctions,
            blend_weights: blend_weights.into_iter().map(sanitize_blend_weight).collect(),
        }
    }

    pub fn id(&self) -> IntersectionId {
        self.id
    }

    pub fn add_junction(&mut self, junction: Junction) {
        self.junctions.push(junction);
    }

    pub fn add_blend_weight(&mut self, weight: f32) {
        self.blend_weights.push(sanitize_blend_weight(weight));
    }

    /// Add a junction together with the default weight for its gap.
    pub fn push_junction_with_default_weight(&mut self, junction: Junction) {
        self.add_junction(junction);
        self.add_blend_weight(DEFAULT_BLEND_WEIGHT);
    }

    pub fn num_gaps(&self) -> usize {
        self.blend_weights.len()
    }

    /// An intersection can be filled only with at least two junctions,
    /// exactly one blend weight per junction, and every weight in `[0, 1]`.
    pub fn validate(&self) -> Result<(), RoadError> {
        if self.junctions.len() < 2 || self.junctions.len() != self.blend_weights.len() {
            return Err(RoadError::MalformedIntersection {
                junctions: self.junctions.len(),
                weights: self.blend_weights.len(),
            });
        }
        if let Some((gap, &weight)) = self
            .blend_weights
            .iter()
            .enumerate()
            .find(|(_, w)| !(0.0..=1.0).contains(*w))
        {
            return Err(RoadError::InvalidBlendWeight { gap, weight });
        }
        Ok(())
    }

    /// Set the weight of one gap, clamped to `[0, 1]`.
    pub fn set_blend_weight(&mut self, gap: usize, weight: f32) -> Result<(), RoadError> {
        let num_gaps = self.num_gaps();
        let slot = self
            .blend_weights
            .get_mut(gap)
            .ok_or(RoadError::BlendGapOutOfRange { gap, num_gaps })?;
        *slot = sanitize_blend_weight(weight);
        Ok(())
    }

    pub fn contains_junction(&self, curve_index: usize, knot_index: usize) -> bool {
        self.junctions
            .iter()
            .any(|j| j.curve_index == curve_index && j.knot_index == knot_index)
    }
}

/// The intersections of one road, in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntersectionRegistry {
    intersections: Vec<Intersection>,
    next_id: u32,
}

impl IntersectionRegistry {
    /// Restore a registry from persisted intersections, keeping their ids.
    /// The id counter continues after the highest restored id; an id of
    /// `u32::MAX` leaves no successor and is rejected.
    pub fn from_parts(intersections: Vec<Intersection>, next_id: u32) -> Result<Self, RoadError> {
        let mut min_next = 0;
        for intersection in &intersections {
            let successor = intersection
                .id
                .0
                .checked_add(1)
                .ok_or(RoadError::IntersectionIdsExhausted)?;
            min_next = min_next.max(successor);
        }
        Ok(Self {
            intersections,
            next_id: next_id.max(min_next),
        })
    }

    /// Register an intersection, assigning it a fresh id. Nothing is added
    /// once the id space is used up.
    pub fn add(&mut self, mut intersection: Intersection) -> Result<IntersectionId, RoadError> {
        let id = IntersectionId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(RoadError::IntersectionIdsExhausted)?;
        intersection.id = id;
        self.intersections.push(intersection);
        Ok(id)
    }

    pub fn remove(&mut self, id: IntersectionId) -> Option<Intersection> {
        let pos = self.intersections.iter().position(|i| i.id == id)?;
        Some(self.intersections.remove(pos))
    }

    /// Remove every intersection, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let removed = self.intersections.len();
        self.intersections.clear();
        removed
    }

    /// First intersection containing the given curve endpoint.
    pub fn find_by_junction(&self, curve_index: usize, knot_index: usize) -> Option<&Intersection> {
        self.intersections
            .iter()
            .find(|i| i.contains_junction(curve_index, knot_index))
    }

    pub fn get(&self, id: IntersectionId) -> Option<&Intersection> {
        self.intersections.iter().find(|i| i.id == id)
    }

    pub fn get_mut(&mut self, id: IntersectionId) -> Option<&mut Intersection> {
        self.intersections.iter_mut().find(|i| i.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Intersection> {
        self.intersections.iter()
    }

    pub fn len(&self) -> usize {
        self.intersections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }
}

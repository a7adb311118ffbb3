//! Knot-based cubic Bezier splines and the container the road samples from.
//!
//! Consecutive knots form one cubic segment
//! `(k0.position, k0.position + k0.tangent_out, k1.position + k1.tangent_in, k1.position)`.
//! A spline's parameter `t` in `[0, 1]` maps uniformly onto its segments.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bezier::{cubic_point, cubic_tangent};
use crate::curve::{CurveFrame, CurveSampler};

/// Knots whose forward direction drops below this squared length after
/// axis alignment are left untouched.
const MIN_ALIGNED_FORWARD_SQ: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Knot {
    pub position: Vec3,
    /// Incoming handle, relative to `position`.
    pub tangent_in: Vec3,
    /// Outgoing handle, relative to `position`.
    pub tangent_out: Vec3,
    pub up: Vec3,
}

impl Default for Knot {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            tangent_in: Vec3::ZERO,
            tangent_out: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

impl Knot {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..default()
        }
    }

    /// Knot with mirrored handles: `tangent_in = -tangent_out`.
    pub fn with_tangent(position: Vec3, tangent_out: Vec3) -> Self {
        Self {
            position,
            tangent_in: -tangent_out,
            tangent_out,
            up: Vec3::Y,
        }
    }

    /// Unit direction the spline leaves this knot in, or zero if both
    /// handles are zero-length.
    pub fn forward(&self) -> Vec3 {
        let out = self.tangent_out.normalize_or_zero();
        if out != Vec3::ZERO {
            return out;
        }
        (-self.tangent_in).normalize_or_zero()
    }
}

/// World axis used by [`SplineContainer::align_knots_to_axis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spline {
    pub knots: Vec<Knot>,
}

impl Spline {
    pub fn new(knots: Vec<Knot>) -> Self {
        Self { knots }
    }

    /// Straight spline from `from` to `to` with evenly spaced handles, so the
    /// parameter is proportional to distance.
    pub fn line(from: Vec3, to: Vec3) -> Self {
        let handle = (to - from) / 3.0;
        Self::new(vec![
            Knot::with_tangent(from, handle),
            Knot::with_tangent(to, handle),
        ])
    }

    /// Smooth spline through `points` (Catmull-Rom handles, one-sided at the ends).
    pub fn through_points(points: &[Vec3]) -> Self {
        let n = points.len();
        let knots = points
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                if n < 2 {
                    return Knot::new(p);
                }
                let handle = if i == 0 {
                    (points[1] - p) / 3.0
                } else if i == n - 1 {
                    (p - points[n - 2]) / 3.0
                } else {
                    (points[i + 1] - points[i - 1]) / 6.0
                };
                Knot::with_tangent(p, handle)
            })
            .collect();
        Self::new(knots)
    }

    pub fn segment_count(&self) -> usize {
        self.knots.len().saturating_sub(1)
    }

    pub fn last_knot_index(&self) -> Option<usize> {
        self.knots.len().checked_sub(1)
    }

    /// Frame at `t` in `[0, 1]` (clamped).
    pub fn evaluate(&self, t: f32) -> CurveFrame {
        let t = t.clamp(0.0, 1.0);
        match self.knots.as_slice() {
            [] => CurveFrame {
                position: Vec3::ZERO,
                tangent: Vec3::Z,
                up: Vec3::Y,
            },
            [knot] => CurveFrame {
                position: knot.position,
                tangent: knot.forward(),
                up: knot.up,
            },
            knots => {
                let segments = knots.len() - 1;
                let scaled = t * segments as f32;
                let seg = (scaled.floor() as usize).min(segments - 1);
                let local = scaled - seg as f32;

                let k0 = &knots[seg];
                let k1 = &knots[seg + 1];
                let p0 = k0.position;
                let p1 = k0.position + k0.tangent_out;
                let p2 = k1.position + k1.tangent_in;
                let p3 = k1.position;

                let mut tangent = cubic_tangent(p0, p1, p2, p3, local);
                // Zero-length handles give a zero derivative at the segment ends.
                if tangent.length_squared() < 1e-12 {
                    tangent = p3 - p0;
                }
                let up = k0.up.lerp(k1.up, local).normalize_or_zero();

                CurveFrame {
                    position: cubic_point(p0, p1, p2, p3, local),
                    tangent,
                    up: if up == Vec3::ZERO { Vec3::Y } else { up },
                }
            }
        }
    }

    /// Approximate arc length by sampling.
    pub fn arc_length(&self) -> f32 {
        let steps = 64 * self.segment_count().max(1);
        let mut length = 0.0_f32;
        let mut prev = self.evaluate(0.0).position;
        for i in 1..=steps {
            let pt = self.evaluate(i as f32 / steps as f32).position;
            length += (pt - prev).length();
            prev = pt;
        }
        length
    }
}

/// The set of splines a road is generated from.
///
/// Mutating it (through `ResMut`) is the curve-change notification: road
/// systems rebuild every `SplineRoad` when this resource changes.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplineContainer {
    pub splines: Vec<Spline>,
}

impl SplineContainer {
    pub fn new(splines: Vec<Spline>) -> Self {
        Self { splines }
    }

    /// Append a spline, returning its curve index.
    pub fn add_spline(&mut self, spline: Spline) -> usize {
        self.splines.push(spline);
        self.splines.len() - 1
    }

    pub fn spline(&self, index: usize) -> Option<&Spline> {
        self.splines.get(index)
    }

    pub fn knot(&self, spline_index: usize, knot_index: usize) -> Option<&Knot> {
        self.splines.get(spline_index)?.knots.get(knot_index)
    }

    pub fn knot_count(&self, spline_index: usize) -> usize {
        self.splines
            .get(spline_index)
            .map(|s| s.knots.len())
            .unwrap_or(0)
    }

    /// Replace a knot. Returns `false` if the spline or knot does not exist.
    pub fn set_knot(&mut self, spline_index: usize, knot_index: usize, knot: Knot) -> bool {
        match self
            .splines
            .get_mut(spline_index)
            .and_then(|s| s.knots.get_mut(knot_index))
        {
            Some(slot) => {
                *slot = knot;
                true
            }
            None => false,
        }
    }

    /// Flatten every knot's forward direction onto the plane perpendicular to
    /// `axis` and make `axis` the knot's up vector. Handle lengths are kept.
    ///
    /// Knots whose forward direction is (nearly) parallel to `axis` are
    /// skipped. Returns the number of knots aligned.
    pub fn align_knots_to_axis(&mut self, axis: Axis) -> usize {
        let mut aligned = 0;
        for spline in &mut self.splines {
            for knot in &mut spline.knots {
                let mut forward = knot.forward();
                match axis {
                    Axis::X => forward.x = 0.0,
                    Axis::Y => forward.y = 0.0,
                    Axis::Z => forward.z = 0.0,
                }
                if forward.length_squared() < MIN_ALIGNED_FORWARD_SQ {
                    continue;
                }
                let forward = forward.normalize();
                let out_len = knot.tangent_out.length();
                let in_len = knot.tangent_in.length();
                knot.tangent_out = forward * out_len;
                knot.tangent_in = -forward * in_len;
                knot.up = axis.unit();
                aligned += 1;
            }
        }
        info!("Aligned {} spline knots to the {:?} axis", aligned, axis);
        aligned
    }
}

impl CurveSampler for SplineContainer {
    fn num_curves(&self) -> usize {
        self.splines.len()
    }

    fn evaluate(&self, curve_index: usize, t: f32) -> CurveFrame {
        match self.splines.get(curve_index) {
            Some(spline) => spline.evaluate(t),
            None => Spline::default().evaluate(t),
        }
    }
}

//! Curve sampling: the narrow interface the mesh builders consume.
//!
//! Curve math itself lives behind [`CurveSampler`]; the builders only ever
//! ask for a position/tangent/up frame at a normalized parameter and turn it
//! into a left/right offset pair.

use bevy::prelude::*;

use crate::config::DEGENERATE_EPSILON;

/// Position and orientation of a curve at one parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveFrame {
    pub position: Vec3,
    pub tangent: Vec3,
    pub up: Vec3,
}

/// Evaluation service for a set of indexed curves.
///
/// `evaluate` must be defined for every `curve_index < num_curves()` and
/// every `t` in `[0, 1]`.
pub trait CurveSampler {
    fn num_curves(&self) -> usize;

    fn evaluate(&self, curve_index: usize, t: f32) -> CurveFrame;
}

/// World-space offset points on either side of a curve at one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledPoint {
    pub right: Vec3,
    pub left: Vec3,
}

impl SampledPoint {
    pub fn center(&self) -> Vec3 {
        (self.right + self.left) * 0.5
    }
}

/// Unit direction pointing to the right of the curve.
///
/// When tangent and up are parallel (or either is zero) the world up axis is
/// tried instead; if that is degenerate too the direction is zero, which
/// collapses both offset points onto the centerline rather than producing NaN.
pub fn right_direction(frame: &CurveFrame) -> Vec3 {
    let right = frame.tangent.cross(frame.up);
    if right.length_squared() > DEGENERATE_EPSILON {
        return right.normalize();
    }
    let fallback = frame.tangent.cross(Vec3::Y);
    if fallback.length_squared() > DEGENERATE_EPSILON {
        return fallback.normalize();
    }
    Vec3::ZERO
}

/// Sample the curve at `t` and offset `half_width` to each side.
pub fn sample_width(
    sampler: &dyn CurveSampler,
    curve_index: usize,
    t: f32,
    half_width: f32,
) -> SampledPoint {
    let frame = sampler.evaluate(curve_index, t);
    let right = right_direction(&frame);
    if right == Vec3::ZERO {
        debug!(
            "Degenerate frame on curve {} at t={}, offsets collapsed to centerline",
            curve_index, t
        );
    }
    SampledPoint {
        right: frame.position + right * half_width,
        left: frame.position - right * half_width,
    }
}

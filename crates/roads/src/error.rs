// ---------------------------------------------------------------------------
// RoadError: failures of road edits and junction building
// ---------------------------------------------------------------------------

use std::fmt;

use crate::intersection::IntersectionId;

/// Errors returned by road edit operations.
///
/// None of these are fatal: the caller logs them and the road keeps its
/// previous state (no entry is added and no rebuild happens).
#[derive(Debug, Clone, PartialEq)]
pub enum RoadError {
    /// Curve index outside `[0, num_curves)`.
    InvalidCurveIndex { index: usize, num_curves: usize },
    /// No intersection with this id is registered on the road.
    UnknownIntersection(IntersectionId),
    /// Blend weight gap index outside `[0, num_gaps)`.
    BlendGapOutOfRange { gap: usize, num_gaps: usize },
    /// Intersection has fewer than two junctions or a weight count mismatch.
    MalformedIntersection { junctions: usize, weights: usize },
    /// A blend weight is NaN or outside `[0, 1]`.
    InvalidBlendWeight { gap: usize, weight: f32 },
    /// Every intersection id of the road has been handed out.
    IntersectionIdsExhausted,
    /// The selected knot is neither the first nor the last knot of its curve.
    NotAnEndpoint { curve_index: usize, knot_index: usize },
    /// A junction needs at least two curve endpoints.
    TooFewJunctions(usize),
    /// The same curve endpoint was selected twice.
    DuplicateJunction { curve_index: usize, knot_index: usize },
}

impl fmt::Display for RoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoadError::InvalidCurveIndex { index, num_curves } => {
                write!(f, "Invalid curve index {index} (road has {num_curves} curves)")
            }
            RoadError::UnknownIntersection(id) => write!(f, "Unknown intersection {}", id.0),
            RoadError::BlendGapOutOfRange { gap, num_gaps } => {
                write!(f, "Blend gap {gap} out of range (intersection has {num_gaps} gaps)")
            }
            RoadError::MalformedIntersection { junctions, weights } => write!(
                f,
                "Malformed intersection: {junctions} junctions with {weights} blend weights"
            ),
            RoadError::InvalidBlendWeight { gap, weight } => {
                write!(f, "Blend weight {weight} of gap {gap} is outside [0, 1]")
            }
            RoadError::IntersectionIdsExhausted => {
                write!(f, "No intersection ids left on this road")
            }
            RoadError::NotAnEndpoint {
                curve_index,
                knot_index,
            } => write!(
                f,
                "Knot {knot_index} of curve {curve_index} is not a curve endpoint"
            ),
            RoadError::TooFewJunctions(count) => {
                write!(f, "A junction needs at least 2 curve endpoints, got {count}")
            }
            RoadError::DuplicateJunction {
                curve_index,
                knot_index,
            } => write!(
                f,
                "Knot {knot_index} of curve {curve_index} was selected more than once"
            ),
        }
    }
}

impl std::error::Error for RoadError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_curve_index() {
        let err = RoadError::InvalidCurveIndex {
            index: 7,
            num_curves: 3,
        };
        let msg = format!("{err}");
        assert!(msg.contains("7"), "got: {msg}");
        assert!(msg.contains("3 curves"), "got: {msg}");
    }

    #[test]
    fn test_display_malformed_intersection() {
        let err = RoadError::MalformedIntersection {
            junctions: 1,
            weights: 1,
        };
        let msg = format!("{err}");
        assert!(msg.contains("Malformed"), "got: {msg}");
    }

    #[test]
    fn test_display_unknown_intersection() {
        let err = RoadError::UnknownIntersection(IntersectionId(42));
        assert!(format!("{err}").contains("42"));
    }

    #[test]
    fn test_display_invalid_blend_weight() {
        let err = RoadError::InvalidBlendWeight {
            gap: 2,
            weight: 7.0,
        };
        let msg = format!("{err}");
        assert!(msg.contains("gap 2"), "got: {msg}");
        assert!(msg.contains("[0, 1]"), "got: {msg}");
    }

    #[test]
    fn test_is_error_trait() {
        let err: Box<dyn std::error::Error> = Box::new(RoadError::TooFewJunctions(1));
        assert!(err.source().is_none());
    }
}

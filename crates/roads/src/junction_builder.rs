//! Turning a selection of spline knots into an intersection.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::RoadError;
use crate::intersection::{Intersection, Junction};
use crate::spline::SplineContainer;

/// A knot picked by the user: spline (curve) index plus knot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KnotRef {
    pub curve_index: usize,
    pub knot_index: usize,
}

impl KnotRef {
    pub fn new(curve_index: usize, knot_index: usize) -> Self {
        Self {
            curve_index,
            knot_index,
        }
    }
}

/// Build an intersection joining the selected curve endpoints.
///
/// Every selected knot must be the first or last knot of its spline and may
/// appear only once. Junctions keep the selection order and each gets the
/// default blend weight.
pub fn build_junction(
    container: &SplineContainer,
    selection: &[KnotRef],
) -> Result<Intersection, RoadError> {
    if selection.len() < 2 {
        return Err(RoadError::TooFewJunctions(selection.len()));
    }

    let num_curves = container.splines.len();
    let mut seen = BTreeSet::new();
    let mut intersection = Intersection::new();

    for knot_ref in selection {
        let KnotRef {
            curve_index,
            knot_index,
        } = *knot_ref;
        let spline = container
            .spline(curve_index)
            .ok_or(RoadError::InvalidCurveIndex {
                index: curve_index,
                num_curves,
            })?;
        let is_endpoint = knot_index == 0 || spline.last_knot_index() == Some(knot_index);
        let knot = match spline.knots.get(knot_index) {
            Some(knot) if is_endpoint => *knot,
            _ => {
                return Err(RoadError::NotAnEndpoint {
                    curve_index,
                    knot_index,
                })
            }
        };
        if !seen.insert(*knot_ref) {
            return Err(RoadError::DuplicateJunction {
                curve_index,
                knot_index,
            });
        }
        intersection.push_junction_with_default_weight(Junction::new(curve_index, knot_index, knot));
    }

    Ok(intersection)
}

//! Ring winding against the configured convention.

use carg_model::{Geometry, IssueKind};
use carg_standards::RingConvention;

use super::Finding;
use crate::geom::signed_area2;

pub fn check(geometry: &Geometry, convention: RingConvention) -> Option<Finding> {
    for (part, rings) in geometry.polygons().into_iter().enumerate() {
        for (index, ring) in rings.iter().enumerate() {
            let area = signed_area2(ring);
            if area == 0.0 {
                continue;
            }
            let exterior = index == 0;
            let clockwise = area < 0.0;
            let expected_clockwise = convention.exterior_clockwise() == exterior;
            if clockwise != expected_clockwise {
                let role = if exterior { "exterior ring" } else { "hole" };
                let winding = if clockwise { "clockwise" } else { "counter-clockwise" };
                return Some(Finding::new(
                    IssueKind::InvalidRingOrientation,
                    format!("{role} {index} of polygon part {part} is {winding} ({convention} convention)"),
                ));
            }
        }
    }
    None
}

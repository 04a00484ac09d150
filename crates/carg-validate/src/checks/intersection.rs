//! Self-intersecting lines and rings.

use carg_model::{Geometry, IssueKind};

use super::Finding;
use crate::geom::{dedup_consecutive, first_self_intersection, is_closed};

pub fn check(geometry: &Geometry) -> Option<Finding> {
    for (part, line) in geometry.lines().into_iter().enumerate() {
        let points = dedup_consecutive(line);
        if let Some((a, b)) = first_self_intersection(&points, is_closed(&points)) {
            return Some(Finding::new(
                IssueKind::SelfIntersection,
                format!("line part {part}: segments {a} and {b} intersect"),
            ));
        }
    }

    for (part, rings) in geometry.polygons().into_iter().enumerate() {
        for (index, ring) in rings.iter().enumerate() {
            let points = dedup_consecutive(ring);
            if let Some((a, b)) = first_self_intersection(&points, true) {
                return Some(Finding::new(
                    IssueKind::SelfIntersection,
                    format!("ring {index} of polygon part {part}: segments {a} and {b} intersect"),
                ));
            }
        }
    }
    None
}

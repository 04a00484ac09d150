//! Geometries without usable coordinates.

use carg_model::{Geometry, IssueKind};

use super::Finding;
use crate::geom::{dedup_consecutive, signed_area2};

pub fn check(geometry: &Geometry) -> Option<Finding> {
    if geometry.is_empty() {
        return Some(Finding::new(IssueKind::EmptyGeometry, "geometry has no coordinates"));
    }
    if geometry.coords().any(|coord| !coord.is_finite()) {
        return Some(Finding::new(IssueKind::EmptyGeometry, "non-finite coordinate"));
    }

    for (part, line) in geometry.lines().into_iter().enumerate() {
        if dedup_consecutive(line).len() < 2 {
            return Some(Finding::new(
                IssueKind::EmptyGeometry,
                format!("line part {part} has fewer than two distinct vertices"),
            ));
        }
    }

    for (part, rings) in geometry.polygons().into_iter().enumerate() {
        if rings.is_empty() {
            return Some(Finding::new(
                IssueKind::EmptyGeometry,
                format!("polygon part {part} has no rings"),
            ));
        }
        for (index, ring) in rings.iter().enumerate() {
            if ring.len() < 4 {
                return Some(Finding::new(
                    IssueKind::EmptyGeometry,
                    format!("ring {index} of polygon part {part} has {} positions", ring.len()),
                ));
            }
            if signed_area2(ring) == 0.0 {
                return Some(Finding::new(
                    IssueKind::EmptyGeometry,
                    format!("ring {index} of polygon part {part} has zero area"),
                ));
            }
        }
    }
    None
}

//! Geometry family and ring closure.

use carg_model::{Geometry, GeometryType, IssueKind};

use super::Finding;
use crate::geom::is_closed;

pub fn check(geometry: &Geometry, declared: GeometryType) -> Option<Finding> {
    if geometry.family() != declared {
        return Some(Finding::new(
            IssueKind::TopologyMismatch,
            format!("{} geometry in {declared} layer", geometry.type_name()),
        ));
    }
    for (part, rings) in geometry.polygons().into_iter().enumerate() {
        for (index, ring) in rings.iter().enumerate() {
            if !ring.is_empty() && !is_closed(ring) {
                return Some(Finding::new(
                    IssueKind::TopologyMismatch,
                    format!("ring {index} of polygon part {part} is not closed"),
                ));
            }
        }
    }
    None
}

//! Geometry check modules.
//!
//! Each module detects one fault kind and reports at most one finding per
//! geometry. Null geometries never reach these checks.

mod empty;
mod intersection;
mod orientation;
mod topology;

use carg_model::{Geometry, GeometryType, IssueKind};
use carg_standards::RingConvention;

/// One fault found on one geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub kind: IssueKind,
    pub detail: String,
}

impl Finding {
    pub(crate) fn new(kind: IssueKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CheckContext {
    pub declared: GeometryType,
    pub rings: RingConvention,
}

/// Run all geometry checks, in issue kind order.
pub fn run_all(geometry: &Geometry, ctx: &CheckContext) -> Vec<Finding> {
    let mut findings = Vec::new();

    // 1. Empty or degenerate geometry
    let empty = empty::check(geometry);
    let degenerate = empty.is_some();
    findings.extend(empty);

    // 2. Self-intersection, on well-formed parts only
    let crossing = if degenerate {
        None
    } else {
        intersection::check(geometry)
    };
    let simple = !degenerate && crossing.is_none();
    findings.extend(crossing);

    // 3. Ring orientation, defined only for simple rings
    if simple {
        findings.extend(orientation::check(geometry, ctx.rings));
    }

    // 4. Geometry family and ring closure
    findings.extend(topology::check(geometry, ctx.declared));

    findings
}

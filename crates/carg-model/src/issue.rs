use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Closed set of geometry faults detected during validation.
///
/// Declaration order is the order in which faults of one record are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    NullGeometry,
    EmptyGeometry,
    SelfIntersection,
    InvalidRingOrientation,
    TopologyMismatch,
}

impl IssueKind {
    pub const ALL: [IssueKind; 5] = [
        IssueKind::NullGeometry,
        IssueKind::EmptyGeometry,
        IssueKind::SelfIntersection,
        IssueKind::InvalidRingOrientation,
        IssueKind::TopologyMismatch,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::NullGeometry => "null_geometry",
            Self::EmptyGeometry => "empty_geometry",
            Self::SelfIntersection => "self_intersection",
            Self::InvalidRingOrientation => "invalid_ring_orientation",
            Self::TopologyMismatch => "topology_mismatch",
        }
    }

    /// Records with this fault are dropped from the output layer.
    pub fn excludes_record(self) -> bool {
        matches!(self, Self::NullGeometry)
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IssueKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == needle)
            .ok_or_else(|| ModelError::UnknownIssueKind(s.to_string()))
    }
}

/// One detected geometry fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometryIssue {
    pub sheet: String,
    /// CARG source layer of the faulted record.
    pub layer: String,
    pub feature_id: String,
    pub kind: IssueKind,
    pub detail: String,
}

/// Run-scoped, append-only list of geometry issues.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLedger {
    issues: Vec<GeometryIssue>,
}

impl IssueLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: GeometryIssue) {
        self.issues.push(issue);
    }

    pub fn append(&mut self, issues: Vec<GeometryIssue>) {
        self.issues.extend(issues);
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeometryIssue> {
        self.issues.iter()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn count_by_kind(&self) -> BTreeMap<IssueKind, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.issues {
            *counts.entry(issue.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Issues grouped by sheet, in ledger order within each sheet.
    pub fn by_sheet(&self) -> BTreeMap<&str, Vec<&GeometryIssue>> {
        let mut groups: BTreeMap<&str, Vec<&GeometryIssue>> = BTreeMap::new();
        for issue in &self.issues {
            groups.entry(issue.sheet.as_str()).or_default().push(issue);
        }
        groups
    }
}

impl<'a> IntoIterator for &'a IssueLedger {
    type Item = &'a GeometryIssue;
    type IntoIter = std::slice::Iter<'a, GeometryIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}

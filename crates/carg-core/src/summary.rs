//! Run summary: what was produced, what failed, and how many recoverable
//! conditions were absorbed along the way.

use std::collections::BTreeMap;

use carg_model::{IssueKind, IssueLedger};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Last stage a declared layer reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerStage {
    NotLoaded,
    Loaded,
    DomainMapped,
    Standardized,
    Merged,
    Validated,
    Emitted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LayerOutcome {
    Emitted { location: String },
    Failed { reason: String },
}

impl LayerOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// One declared CARG input layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSummary {
    pub layer: String,
    pub output: String,
    /// Dataset layer the records were read from.
    pub source: Option<String>,
    pub records_read: usize,
    pub stage: LayerStage,
    pub outcome: LayerOutcome,
}

/// One of the seven deliverables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSummary {
    pub name: String,
    pub contributors: Vec<String>,
    pub records: usize,
    /// Records left out because they had no geometry.
    pub dropped: usize,
    pub issues: usize,
    pub outcome: LayerOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyCounts {
    pub unmapped_codes: usize,
    pub encoding_repairs: usize,
    pub unparseable_values: usize,
    pub truncated_values: usize,
    pub defaulted_fields: usize,
    pub inherited_sheet: usize,
    pub unmatched_join_keys: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub source: String,
    pub output: String,
    pub sheet: String,
    pub ring_convention: String,
    pub layers: Vec<LayerSummary>,
    pub outputs: Vec<OutputSummary>,
    pub issues_by_kind: BTreeMap<IssueKind, usize>,
    pub total_issues: usize,
    pub issue_reports: Vec<String>,
    /// Domain tables that could not be found, each listed once.
    pub missing_tables: Vec<String>,
    pub missing_auxiliary: Vec<String>,
    pub anomalies: AnomalyCounts,
    /// SHA-256 of the issue ledger; equal for identical input.
    pub ledger_digest: String,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.outputs.iter().any(|output| output.outcome.is_failed())
            || self.layers.iter().any(|layer| layer.outcome.is_failed())
    }

    pub fn emitted(&self) -> usize {
        self.outputs
            .iter()
            .filter(|output| !output.outcome.is_failed())
            .count()
    }

    pub fn output(&self, name: &str) -> Option<&OutputSummary> {
        self.outputs.iter().find(|output| output.name == name)
    }

    pub fn layer(&self, id: &str) -> Option<&LayerSummary> {
        self.layers.iter().find(|layer| layer.layer == id)
    }
}

/// Hex SHA-256 over the ledger rows in ledger order.
pub fn ledger_digest(ledger: &IssueLedger) -> String {
    let mut hasher = Sha256::new();
    for issue in ledger {
        for part in [
            issue.sheet.as_str(),
            issue.layer.as_str(),
            issue.feature_id.as_str(),
            issue.kind.label(),
            issue.detail.as_str(),
        ] {
            hasher.update(part.as_bytes());
            hasher.update([0x1f]);
        }
        hasher.update([b'\n']);
    }
    hex::encode(hasher.finalize())
}

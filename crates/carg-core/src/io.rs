//! Boundaries between the pipeline and the datasets it reads and writes.

use anyhow::Result;
use carg_model::{AttributeTable, FeatureRecord, IssueLedger, OutputLayer};

use crate::summary::RunSummary;

/// A dataset holding CARG layers and the auxiliary attribute tables.
pub trait LayerSource {
    /// Human-readable location, for logs and the summary.
    fn describe(&self) -> String;

    /// Name of the dataset layer matching one of `patterns`, if any.
    fn find_layer(&self, patterns: &[&str]) -> Option<String>;

    /// Reads `layer`, tagging every record with `layer_id` and its position.
    fn read_layer(&self, layer: &str, layer_id: &str) -> Result<Vec<FeatureRecord>>;

    /// Reads a geometry-less table; `Ok(None)` when the dataset has none by that name.
    fn read_table(&self, name: &str) -> Result<Option<AttributeTable>>;
}

/// Destination of a run. Each method returns the location it wrote to.
pub trait LayerSink {
    fn location(&self) -> String;

    fn write_layer(&mut self, layer: &OutputLayer) -> Result<String>;

    /// Writes one report per sheet in the ledger.
    fn write_issue_reports(&mut self, ledger: &IssueLedger) -> Result<Vec<String>>;

    fn write_summary(&mut self, summary: &RunSummary) -> Result<String>;
}

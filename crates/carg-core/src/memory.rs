//! In-memory source and sink.

use std::collections::BTreeMap;

use anyhow::{Result, anyhow};
use carg_model::{AttributeTable, FeatureRecord, IssueLedger, OutputLayer};

use crate::io::{LayerSink, LayerSource};
use crate::summary::RunSummary;

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    layers: BTreeMap<String, Vec<FeatureRecord>>,
    tables: Vec<AttributeTable>,
    /// Layers that exist but fail to read.
    broken: Vec<String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_layer(mut self, name: impl Into<String>, records: Vec<FeatureRecord>) -> Self {
        self.layers.insert(name.into(), records);
        self
    }

    #[must_use]
    pub fn with_table(mut self, table: AttributeTable) -> Self {
        self.tables.push(table);
        self
    }

    #[must_use]
    pub fn with_broken_layer(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.layers.insert(name.clone(), Vec::new());
        self.broken.push(name);
        self
    }
}

impl LayerSource for MemorySource {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn find_layer(&self, patterns: &[&str]) -> Option<String> {
        patterns.iter().find_map(|pattern| {
            self.layers
                .keys()
                .find(|name| name.eq_ignore_ascii_case(pattern))
                .cloned()
        })
    }

    fn read_layer(&self, layer: &str, layer_id: &str) -> Result<Vec<FeatureRecord>> {
        if self.broken.iter().any(|name| name == layer) {
            return Err(anyhow!("layer {layer} is unreadable"));
        }
        let records = self
            .layers
            .get(layer)
            .ok_or_else(|| anyhow!("layer {layer} not found"))?;
        Ok(records
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, mut record)| {
                record.provenance.source_layer = layer_id.to_string();
                record.provenance.fid = index as u64;
                record
            })
            .collect())
    }

    fn read_table(&self, name: &str) -> Result<Option<AttributeTable>> {
        Ok(self
            .tables
            .iter()
            .find(|table| table.name.eq_ignore_ascii_case(name))
            .cloned())
    }
}

/// Keeps everything written to it.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub layers: Vec<OutputLayer>,
    pub reports: BTreeMap<String, usize>,
    pub ledger: IssueLedger,
    pub summary: Option<RunSummary>,
    /// Output layers whose write fails.
    pub fail_on: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(&self, name: &str) -> Option<&OutputLayer> {
        self.layers.iter().find(|layer| layer.name == name)
    }

    /// Nothing at all was written.
    pub fn is_untouched(&self) -> bool {
        self.layers.is_empty() && self.reports.is_empty() && self.summary.is_none()
    }
}

impl LayerSink for MemorySink {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn write_layer(&mut self, layer: &OutputLayer) -> Result<String> {
        if self.fail_on.iter().any(|name| *name == layer.name) {
            return Err(anyhow!("cannot write {}", layer.name));
        }
        self.layers.push(layer.clone());
        Ok(format!("memory://{}", layer.name))
    }

    fn write_issue_reports(&mut self, ledger: &IssueLedger) -> Result<Vec<String>> {
        self.ledger = ledger.clone();
        let mut written = Vec::new();
        for (sheet, issues) in ledger.by_sheet() {
            self.reports.insert(sheet.to_string(), issues.len());
            written.push(format!("memory://F{sheet}_geometry_issues.csv"));
        }
        Ok(written)
    }

    fn write_summary(&mut self, summary: &RunSummary) -> Result<String> {
        self.summary = Some(summary.clone());
        Ok("memory://run_summary.json".to_string())
    }
}

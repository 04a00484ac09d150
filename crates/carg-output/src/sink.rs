use std::path::{Path, PathBuf};

use anyhow::Result;
use carg_core::{LayerSink, RunSummary};
use carg_model::{IssueLedger, OutputLayer};
use tracing::{info, warn};

use crate::geojson::write_geojson_layer;
use crate::report::{report_file_name, report_file_names, write_issue_report};
use crate::summary::write_summary_json;

/// Writes every deliverable into one directory, created on first write.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl LayerSink for DirectorySink {
    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn write_layer(&mut self, layer: &OutputLayer) -> Result<String> {
        let path = write_geojson_layer(&self.root, layer)?;
        Ok(path.display().to_string())
    }

    fn write_issue_reports(&mut self, ledger: &IssueLedger) -> Result<Vec<String>> {
        let sheets = ledger.by_sheet();
        let names = report_file_names(sheets.iter().map(|(sheet, _)| *sheet));
        let mut written = Vec::new();
        for ((sheet, issues), name) in sheets.iter().zip(&names) {
            if *name != report_file_name(sheet) {
                warn!(sheet, file = %name, "sheet name collides with another report; renamed");
            }
            let path = write_issue_report(&self.root, name, issues)?;
            info!(sheet, issues = issues.len(), path = %path.display(), "issue report written");
            written.push(path.display().to_string());
        }
        Ok(written)
    }

    fn write_summary(&mut self, summary: &RunSummary) -> Result<String> {
        let path = write_summary_json(&self.root, summary)?;
        Ok(path.display().to_string())
    }
}

//! Per-sheet geometry issue reports.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use carg_model::GeometryIssue;
use csv::WriterBuilder;

use crate::common::{ensure_output_dir, sanitize_sheet};
use crate::error::{OutputError, Result};

pub const REPORT_HEADER: [&str; 4] = ["Layer", "Feature_ID", "Issue", "Detail"];

pub fn report_file_name(sheet: &str) -> String {
    format!("F{}_geometry_issues.csv", sanitize_sheet(sheet))
}

/// One distinct file name per sheet, in the given order.
///
/// A sheet whose sanitized name is already taken gets `_2`, `_3`, ... after
/// the sheet part.
pub fn report_file_names<'a>(sheets: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = BTreeSet::new();
    sheets
        .into_iter()
        .map(|sheet| {
            let mut name = report_file_name(sheet);
            let mut suffix = 2;
            while taken.contains(&name) {
                name = format!("F{}_{suffix}_geometry_issues.csv", sanitize_sheet(sheet));
                suffix += 1;
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}

/// CSV text of one sheet's report, rows in ledger order.
pub fn render_issue_report(issues: &[&GeometryIssue]) -> std::result::Result<String, csv::Error> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(REPORT_HEADER)?;
    for issue in issues {
        writer.write_record([
            issue.layer.as_str(),
            issue.feature_id.as_str(),
            issue.kind.label(),
            issue.detail.as_str(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|error| csv::Error::from(error.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes one sheet's report as `dir/file_name` and returns its path.
pub fn write_issue_report(
    dir: &Path,
    file_name: &str,
    issues: &[&GeometryIssue],
) -> Result<PathBuf> {
    ensure_output_dir(dir)?;
    let path = dir.join(file_name);
    let text = render_issue_report(issues).map_err(|error| OutputError::Csv {
        path: path.clone(),
        message: error.to_string(),
    })?;
    fs::write(&path, text).map_err(|e| OutputError::io(&path, e))?;
    Ok(path)
}

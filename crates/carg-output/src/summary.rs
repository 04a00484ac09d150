use std::fs;
use std::path::{Path, PathBuf};

use carg_core::RunSummary;

use crate::common::ensure_output_dir;
use crate::error::{OutputError, Result};

pub const SUMMARY_FILE_NAME: &str = "run_summary.json";

pub fn write_summary_json(dir: &Path, summary: &RunSummary) -> Result<PathBuf> {
    ensure_output_dir(dir)?;
    let path = dir.join(SUMMARY_FILE_NAME);
    let bytes = serde_json::to_vec_pretty(summary).map_err(|source| OutputError::Json {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, bytes).map_err(|e| OutputError::io(&path, e))?;
    Ok(path)
}

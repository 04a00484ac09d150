//! Shared helpers for output file naming and directories.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{OutputError, Result};

/// Ensure the output directory exists.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| OutputError::io(dir, e))
}

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]").expect("valid file name pattern"));

/// Sheet identifier reduced to `[A-Za-z0-9_-]` for use in a file name.
///
/// Blank identifiers become `unknown`.
pub fn sanitize_sheet(sheet: &str) -> String {
    let trimmed = sheet.trim();
    if trimmed.is_empty() {
        return "unknown".to_string();
    }
    UNSAFE_CHARS.replace_all(trimmed, "_").into_owned()
}

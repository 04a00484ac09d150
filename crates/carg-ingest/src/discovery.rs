//! Layer and table discovery.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use carg_model::CaseInsensitiveSet;
use tracing::debug;

use crate::error::{IngestError, Result};

const LAYER_EXTENSIONS: &[&str] = &["geojson", "json"];
const TABLE_EXTENSIONS: &[&str] = &["csv"];

/// Files of a dataset directory keyed by file stem.
#[derive(Debug, Clone, Default)]
pub struct DatasetFiles {
    pub layers: BTreeMap<String, PathBuf>,
    pub tables: BTreeMap<String, PathBuf>,
}

/// Lists layer and table files in `dir`, sorted by file name.
///
/// When two files share a stem the first one by file name wins.
pub fn list_dataset_files(dir: &Path) -> Result<DatasetFiles> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;
    let mut paths = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut files = DatasetFiles::default();
    for path in paths {
        let Some(stem) = path.file_stem().and_then(|v| v.to_str()) else {
            continue;
        };
        let stem = stem.to_string();
        if has_extension(&path, LAYER_EXTENSIONS) {
            files.layers.entry(stem).or_insert(path);
        } else if has_extension(&path, TABLE_EXTENSIONS) {
            files.tables.entry(stem).or_insert(path);
        }
    }
    debug!(
        dir = %dir.display(),
        layers = files.layers.len(),
        tables = files.tables.len(),
        "dataset files listed"
    );
    Ok(files)
}

/// Picks the layer for `patterns`: an exact case-insensitive name first,
/// then the first name containing one of the patterns.
pub fn find_layer_by_pattern<'a, I>(names: I, patterns: &[&str]) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let names: Vec<&str> = names.into_iter().collect();
    let exact = CaseInsensitiveSet::new(names.iter().copied());
    if let Some(name) = exact.find_first(patterns.iter().copied()) {
        return Some(name.to_string());
    }
    patterns.iter().find_map(|pattern| {
        let pattern = pattern.to_ascii_uppercase();
        names
            .iter()
            .find(|name| name.to_ascii_uppercase().contains(&pattern))
            .map(|name| (*name).to_string())
    })
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_beats_substring() {
        let names = ["main.ST018Polygon", "st018polygon", "ST018Polyline"];
        assert_eq!(
            find_layer_by_pattern(names, &["ST018Polygon", "main.ST018Polygon"]),
            Some("st018polygon".to_string())
        );
    }

    #[test]
    fn substring_fallback() {
        let names = ["export_ST021Polyline_v2"];
        assert_eq!(
            find_layer_by_pattern(names, &["ST021Polyline"]),
            Some("export_ST021Polyline_v2".to_string())
        );
        assert_eq!(find_layer_by_pattern(names, &["ST010Point"]), None);
    }
}

//! Domain tables stored as CSV exports of the `domini` directory.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use carg_model::DomainTable;
use csv::{ByteRecord, ReaderBuilder};
use tracing::warn;

use crate::domain_cache::{DomainTableSource, TableLoad, table_key};
use crate::error::StandardsError;

/// Code column and description pattern for a table.
///
/// Most tables use `CODE` and the first column whose name contains `DESC`;
/// the sheet table stores the sheet number in `N1` and its name in `N2`.
pub fn domain_columns(table: &str) -> (&'static str, &'static str) {
    if table_key(table).eq_ignore_ascii_case("d_foglio") {
        ("N1", "N2")
    } else {
        ("CODE", "DESC")
    }
}

#[derive(Debug, Clone)]
pub struct CsvDomainDirectory {
    root: PathBuf,
}

impl CsvDomainDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.csv", table_key(name)))
    }
}

impl DomainTableSource for CsvDomainDirectory {
    fn is_available(&self) -> bool {
        self.root.is_dir()
    }

    fn load_table(&self, name: &str) -> Result<TableLoad, StandardsError> {
        let path = self.table_path(name);
        if !path.is_file() {
            return Ok(TableLoad::Missing);
        }
        let (code_column, desc_pattern) = domain_columns(name);
        read_domain_csv(&path, table_key(name), code_column, desc_pattern)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Reads a two-column relation out of a CSV file with arbitrary extra columns.
pub fn read_domain_csv(
    path: &Path,
    name: &str,
    code_column: &str,
    desc_pattern: &str,
) -> Result<TableLoad, StandardsError> {
    let csv_error = |error: csv::Error| StandardsError::Csv {
        path: path.to_path_buf(),
        message: error.to_string(),
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let mut encoding_repairs = 0usize;
    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(csv_error)?
        .iter()
        .map(|bytes| {
            let (text, repaired) = decode(bytes);
            encoding_repairs += usize::from(repaired);
            text.trim().trim_matches('\u{feff}').to_string()
        })
        .collect();

    let Some(code_idx) = headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(code_column))
    else {
        warn!(path = %path.display(), column = code_column, "code column not found in domain table");
        return Ok(TableLoad::Missing);
    };
    let pattern = desc_pattern.to_ascii_uppercase();
    let Some(desc_idx) = headers
        .iter()
        .enumerate()
        .find(|(idx, header)| *idx != code_idx && header.to_ascii_uppercase().contains(&pattern))
        .map(|(idx, _)| idx)
    else {
        warn!(path = %path.display(), pattern = desc_pattern, "description column not found in domain table");
        return Ok(TableLoad::Missing);
    };

    let mut table = DomainTable::new(name);
    let mut record = ByteRecord::new();
    while reader.read_byte_record(&mut record).map_err(csv_error)? {
        let (Some(code), Some(desc)) = (record.get(code_idx), record.get(desc_idx)) else {
            continue;
        };
        let (code, code_repaired) = decode(code);
        let (desc, desc_repaired) = decode(desc);
        encoding_repairs += usize::from(code_repaired) + usize::from(desc_repaired);
        if desc.trim().is_empty() {
            continue;
        }
        table.insert(&code, desc.into_owned());
    }

    Ok(TableLoad::Loaded {
        table,
        encoding_repairs,
    })
}

/// Lossy UTF-8 decoding; the flag reports whether any byte was replaced.
fn decode(bytes: &[u8]) -> (Cow<'_, str>, bool) {
    let text = String::from_utf8_lossy(bytes);
    let repaired = matches!(text, Cow::Owned(_));
    (text, repaired)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_table_uses_numbered_columns() {
        assert_eq!(domain_columns("d_foglio.dbf"), ("N1", "N2"));
        assert_eq!(domain_columns("d_stato"), ("CODE", "DESC"));
    }

    #[test]
    fn decode_flags_invalid_bytes() {
        let (text, repaired) = decode(b"caf\xe8");
        assert!(repaired);
        assert_eq!(text, "caf\u{fffd}");
        assert!(!decode("città".as_bytes()).1);
    }
}

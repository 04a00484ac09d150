//! Geometry-less attribute tables exported as CSV.

use std::path::Path;

use carg_model::{AttributeTable, FieldMap, FieldValue};
use csv::ReaderBuilder;

use crate::error::{IngestError, Result};

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Reads `path` as the table `name`. Empty cells are null, everything else is text.
///
/// Cells are decoded lossily, so a stray Latin-1 byte never fails the table.
pub fn read_attribute_table(path: &Path, name: &str) -> Result<AttributeTable> {
    let csv_error = |error: csv::Error| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: error.to_string(),
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(csv_error)?
        .iter()
        .map(|raw| normalize_header(&String::from_utf8_lossy(raw)))
        .collect();

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record.map_err(csv_error)?;
        let row: FieldMap = headers
            .iter()
            .enumerate()
            .filter(|(_, header)| !header.is_empty())
            .map(|(index, header)| {
                let cell = record
                    .get(index)
                    .map(|raw| String::from_utf8_lossy(raw).trim().to_string())
                    .unwrap_or_default();
                let value = if cell.is_empty() {
                    FieldValue::Null
                } else {
                    FieldValue::Text(cell)
                };
                (header.clone(), value)
            })
            .collect();
        rows.push(row);
    }
    Ok(AttributeTable::new(name, rows))
}

//! GeoJSON FeatureCollection reading.

use std::path::Path;

use carg_model::{Coord, FeatureRecord, FieldValue, Geometry};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Reads every feature of the collection at `path` as a record of `layer_id`.
///
/// A feature whose geometry cannot be read keeps its attributes and gets no
/// geometry, so it is reported downstream rather than lost here.
pub fn read_geojson_layer(path: &Path, layer_id: &str) -> Result<Vec<FeatureRecord>> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::file_read(path, e))?;
    let root: Value = serde_json::from_slice(&bytes).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    match root.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {}
        other => {
            return Err(IngestError::InvalidGeoJson {
                path: path.to_path_buf(),
                message: format!("unexpected type {}", other.unwrap_or("(none)")),
            });
        }
    }
    let features = root
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| IngestError::InvalidGeoJson {
            path: path.to_path_buf(),
            message: "missing features array".to_string(),
        })?;

    let mut unreadable = 0usize;
    let records: Vec<FeatureRecord> = features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            let mut record = FeatureRecord::new(layer_id, index as u64);
            if let Some(Value::Object(properties)) = feature.get("properties") {
                for (name, value) in properties {
                    record.fields.insert(name.clone(), field_value(value));
                }
            }
            record.geometry = match feature.get("geometry") {
                None | Some(Value::Null) => None,
                Some(geometry) => match parse_geometry(geometry) {
                    Ok(geometry) => Some(geometry),
                    Err(message) => {
                        unreadable += 1;
                        debug!(layer = layer_id, feature = index, %message, "geometry not readable");
                        None
                    }
                },
            };
            record
        })
        .collect();

    if unreadable > 0 {
        warn!(layer = layer_id, unreadable, "features with unreadable geometry");
    }
    debug!(layer = layer_id, path = %path.display(), records = records.len(), "layer read");
    Ok(records)
}

fn field_value(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(flag) => FieldValue::Integer(i64::from(*flag)),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => FieldValue::Integer(integer),
            None => number.as_f64().map_or(FieldValue::Null, FieldValue::Real),
        },
        Value::String(text) => FieldValue::Text(text.clone()),
        other => FieldValue::Text(other.to_string()),
    }
}

/// Parses a GeoJSON geometry object.
pub fn parse_geometry(value: &Value) -> std::result::Result<Geometry, String> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or("geometry without type")?;
    let coordinates = value
        .get("coordinates")
        .ok_or_else(|| format!("{kind} without coordinates"))?;
    let geometry = match kind {
        "Point" => Geometry::Point(coord(coordinates)?),
        "MultiPoint" => Geometry::MultiPoint(coords(coordinates)?),
        "LineString" => Geometry::LineString(coords(coordinates)?),
        "MultiLineString" => Geometry::MultiLineString(nested(coordinates, coords)?),
        "Polygon" => Geometry::Polygon(nested(coordinates, coords)?),
        "MultiPolygon" => {
            Geometry::MultiPolygon(nested(coordinates, |rings| nested(rings, coords))?)
        }
        other => return Err(format!("unsupported geometry type {other}")),
    };
    Ok(geometry)
}

fn coord(value: &Value) -> std::result::Result<Coord, String> {
    let position = value.as_array().ok_or("position is not an array")?;
    match (
        position.first().and_then(Value::as_f64),
        position.get(1).and_then(Value::as_f64),
    ) {
        (Some(x), Some(y)) => Ok(Coord::new(x, y)),
        _ => Err(format!("invalid position {value}")),
    }
}

fn coords(value: &Value) -> std::result::Result<Vec<Coord>, String> {
    nested(value, coord)
}

fn nested<T>(
    value: &Value,
    parse: impl Fn(&Value) -> std::result::Result<T, String>,
) -> std::result::Result<Vec<T>, String> {
    value
        .as_array()
        .ok_or_else(|| format!("expected an array, found {value}"))?
        .iter()
        .map(parse)
        .collect()
}

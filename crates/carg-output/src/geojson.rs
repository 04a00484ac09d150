use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use carg_model::{Coord, FeatureRecord, FieldValue, Geometry, OutputLayer};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::common::ensure_output_dir;
use crate::error::{OutputError, Result};

/// The layer as a FeatureCollection. Properties follow `field_order`; a field
/// a record lacks is written as null.
pub fn layer_to_geojson(layer: &OutputLayer) -> Value {
    let features: Vec<Value> = layer
        .records
        .iter()
        .map(|record| feature(record, &layer.field_order))
        .collect();
    json!({
        "type": "FeatureCollection",
        "name": layer.name,
        "features": features,
    })
}

/// Writes `<dir>/<layer>.geojson` and returns its path.
pub fn write_geojson_layer(dir: &Path, layer: &OutputLayer) -> Result<PathBuf> {
    ensure_output_dir(dir)?;
    let path = dir.join(format!("{}.geojson", layer.name));
    let file = File::create(&path).map_err(|e| OutputError::io(&path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &layer_to_geojson(layer)).map_err(|source| {
        OutputError::Json {
            path: path.clone(),
            source,
        }
    })?;
    writer.flush().map_err(|e| OutputError::io(&path, e))?;
    debug!(layer = %layer.name, records = layer.len(), path = %path.display(), "layer written");
    Ok(path)
}

fn feature(record: &FeatureRecord, field_order: &[String]) -> Value {
    let mut properties = Map::new();
    for name in field_order {
        let value = record.fields.get(name).map_or(Value::Null, property);
        properties.insert(name.clone(), value);
    }
    json!({
        "type": "Feature",
        "properties": properties,
        "geometry": record.geometry.as_ref().map_or(Value::Null, geometry),
    })
}

fn property(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Integer(number) => Value::from(*number),
        FieldValue::Real(number) => serde_json::Number::from_f64(*number).map_or(Value::Null, Value::Number),
        FieldValue::Text(text) => Value::String(text.clone()),
    }
}

fn position(coord: &Coord) -> Value {
    json!([coord.x, coord.y])
}

fn positions(coords: &[Coord]) -> Value {
    Value::Array(coords.iter().map(position).collect())
}

fn rings(parts: &[Vec<Coord>]) -> Value {
    Value::Array(parts.iter().map(|part| positions(part)).collect())
}

fn geometry(geometry: &Geometry) -> Value {
    let coordinates = match geometry {
        Geometry::Point(coord) => position(coord),
        Geometry::MultiPoint(coords) | Geometry::LineString(coords) => positions(coords),
        Geometry::MultiLineString(parts) | Geometry::Polygon(parts) => rings(parts),
        Geometry::MultiPolygon(polygons) => {
            Value::Array(polygons.iter().map(|polygon| rings(polygon)).collect())
        }
    };
    json!({
        "type": geometry.type_name(),
        "coordinates": coordinates,
    })
}

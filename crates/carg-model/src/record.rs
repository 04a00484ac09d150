use serde::{Deserialize, Serialize};

use crate::geometry::{Geometry, GeometryType};
use crate::value::FieldValue;

/// Attribute table row that keeps field insertion order.
///
/// Names are compared exactly by `get`/`insert`; the `*_ignore_case` helpers
/// match the way shapefile and geodatabase producers treat field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn get_ignore_case(&self, name: &str) -> Option<&FieldValue> {
        self.find_name(name).and_then(|actual| self.get(actual))
    }

    /// Exact match first, then case-insensitive.
    pub fn lookup(&self, name: &str) -> Option<&FieldValue> {
        self.get(name).or_else(|| self.get_ignore_case(name))
    }

    /// Stored spelling of `name`, matched case-insensitively.
    pub fn find_name(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(key, _)| key.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sets `name`, replacing an existing value in place or appending.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

/// Where a record came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// CARG layer identifier, e.g. `ST018Polyline`.
    pub source_layer: String,
    /// Zero-based position in the source layer.
    pub fid: u64,
    /// Map sheet ("Foglio") used to group quality reports.
    pub sheet: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub geometry: Option<Geometry>,
    pub fields: FieldMap,
    pub provenance: Provenance,
}

impl FeatureRecord {
    pub fn new(source_layer: impl Into<String>, fid: u64) -> Self {
        Self {
            geometry: None,
            fields: FieldMap::new(),
            provenance: Provenance {
                source_layer: source_layer.into(),
                fid,
                sheet: None,
            },
        }
    }

    #[must_use]
    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name, value.into());
        self
    }

    #[must_use]
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.provenance.sheet = Some(sheet.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// A named, ordered collection of standardized records ready to be written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputLayer {
    pub name: String,
    pub geometry_type: GeometryType,
    pub field_order: Vec<String>,
    pub records: Vec<FeatureRecord>,
}

impl OutputLayer {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A geometry-less table, such as the polygon layer's auxiliary tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeTable {
    pub name: String,
    pub rows: Vec<FieldMap>,
}

impl AttributeTable {
    pub fn new(name: impl Into<String>, rows: Vec<FieldMap>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

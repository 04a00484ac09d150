use std::path::{Path, PathBuf};

use anyhow::Result;
use carg_core::LayerSource;
use carg_model::{AttributeTable, FeatureRecord};
use tracing::info;

use crate::csv_table::read_attribute_table;
use crate::discovery::{DatasetFiles, find_layer_by_pattern, list_dataset_files};
use crate::error::IngestError;
use crate::geojson::read_geojson_layer;

/// A dataset directory of GeoJSON layers and CSV tables.
#[derive(Debug, Clone)]
pub struct GeoJsonDirectory {
    root: PathBuf,
    files: DatasetFiles,
}

impl GeoJsonDirectory {
    pub fn open(root: impl Into<PathBuf>) -> crate::Result<Self> {
        let root = root.into();
        let files = list_dataset_files(&root)?;
        info!(
            root = %root.display(),
            layers = files.layers.len(),
            tables = files.tables.len(),
            "dataset opened"
        );
        Ok(Self { root, files })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.files.layers.keys().map(String::as_str)
    }
}

impl LayerSource for GeoJsonDirectory {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn find_layer(&self, patterns: &[&str]) -> Option<String> {
        find_layer_by_pattern(self.layer_names(), patterns)
    }

    fn read_layer(&self, layer: &str, layer_id: &str) -> Result<Vec<FeatureRecord>> {
        let path = self
            .files
            .layers
            .get(layer)
            .ok_or_else(|| IngestError::LayerNotFound {
                patterns: layer.to_string(),
            })?;
        Ok(read_geojson_layer(path, layer_id)?)
    }

    fn read_table(&self, name: &str) -> Result<Option<AttributeTable>> {
        let found = self
            .files
            .tables
            .iter()
            .find(|(stem, _)| stem.eq_ignore_ascii_case(name));
        match found {
            Some((_, path)) => Ok(Some(read_attribute_table(path, name)?)),
            None => Ok(None),
        }
    }
}

//! Reading a CARG dataset exported as a directory of GeoJSON layers.
//!
//! Each `*.geojson` (or `*.json`) file is one layer named after its file stem;
//! each `*.csv` file is one geometry-less attribute table.

pub mod csv_table;
pub mod discovery;
pub mod error;
pub mod geojson;
pub mod source;

pub use csv_table::read_attribute_table;
pub use discovery::{DatasetFiles, find_layer_by_pattern, list_dataset_files};
pub use error::{IngestError, Result};
pub use geojson::{read_geojson_layer, parse_geometry};
pub use source::GeoJsonDirectory;

//! Run configuration loaded from TOML.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StandardsError;

/// Winding expected for polygon rings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RingConvention {
    /// Exterior rings clockwise, holes counter-clockwise (shapefile).
    #[default]
    Esri,
    /// Exterior rings counter-clockwise, holes clockwise (GeoJSON / simple features).
    Ogc,
}

impl RingConvention {
    /// Whether an exterior ring is expected to wind clockwise.
    pub fn exterior_clockwise(self) -> bool {
        matches!(self, Self::Esri)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Esri => "esri",
            Self::Ogc => "ogc",
        }
    }
}

impl fmt::Display for RingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub domini_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    /// Sheet identifier for records without their own.
    pub sheet: Option<String>,
    pub ring_convention: RingConvention,
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self, StandardsError> {
        let contents = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        Self::parse(&contents).map_err(|source| StandardsError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

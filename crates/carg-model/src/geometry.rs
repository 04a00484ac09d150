use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Declared geometry family of a CARG layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryType {
    Point,
    Polyline,
    Polygon,
}

impl GeometryType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Polyline => "polyline",
            Self::Polygon => "polygon",
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GeometryType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "point" | "multipoint" => Ok(Self::Point),
            "polyline" | "line" | "linestring" | "multilinestring" => Ok(Self::Polyline),
            "polygon" | "multipolygon" => Ok(Self::Polygon),
            other => Err(ModelError::UnknownGeometryType(other.to_string())),
        }
    }
}

/// A planar vector geometry. Rings are stored as written by the producer,
/// including the closing position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(Coord),
    MultiPoint(Vec<Coord>),
    LineString(Vec<Coord>),
    MultiLineString(Vec<Vec<Coord>>),
    Polygon(Vec<Vec<Coord>>),
    MultiPolygon(Vec<Vec<Vec<Coord>>>),
}

impl Geometry {
    pub fn family(&self) -> GeometryType {
        match self {
            Self::Point(_) | Self::MultiPoint(_) => GeometryType::Point,
            Self::LineString(_) | Self::MultiLineString(_) => GeometryType::Polyline,
            Self::Polygon(_) | Self::MultiPolygon(_) => GeometryType::Polygon,
        }
    }

    /// GeoJSON type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Point(_) => "Point",
            Self::MultiPoint(_) => "MultiPoint",
            Self::LineString(_) => "LineString",
            Self::MultiLineString(_) => "MultiLineString",
            Self::Polygon(_) => "Polygon",
            Self::MultiPolygon(_) => "MultiPolygon",
        }
    }

    pub fn coord_count(&self) -> usize {
        match self {
            Self::Point(_) => 1,
            Self::MultiPoint(points) | Self::LineString(points) => points.len(),
            Self::MultiLineString(lines) | Self::Polygon(lines) => lines.iter().map(Vec::len).sum(),
            Self::MultiPolygon(polygons) => polygons
                .iter()
                .flat_map(|rings| rings.iter())
                .map(Vec::len)
                .sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.coord_count() == 0
    }

    /// Line parts of a polyline geometry; empty for other families.
    pub fn lines(&self) -> Vec<&[Coord]> {
        match self {
            Self::LineString(line) => vec![line.as_slice()],
            Self::MultiLineString(lines) => lines.iter().map(Vec::as_slice).collect(),
            _ => Vec::new(),
        }
    }

    /// Polygon parts as ring lists (exterior first); empty for other families.
    pub fn polygons(&self) -> Vec<&[Vec<Coord>]> {
        match self {
            Self::Polygon(rings) => vec![rings.as_slice()],
            Self::MultiPolygon(polygons) => polygons.iter().map(Vec::as_slice).collect(),
            _ => Vec::new(),
        }
    }

    pub fn coords(&self) -> Box<dyn Iterator<Item = Coord> + '_> {
        match self {
            Self::Point(coord) => Box::new(std::iter::once(*coord)),
            Self::MultiPoint(points) | Self::LineString(points) => Box::new(points.iter().copied()),
            Self::MultiLineString(lines) | Self::Polygon(lines) => {
                Box::new(lines.iter().flatten().copied())
            }
            Self::MultiPolygon(polygons) => Box::new(polygons.iter().flatten().flatten().copied()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Coord> {
        [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)]
            .into_iter()
            .map(Coord::from)
            .collect()
    }

    #[test]
    fn family_and_counts() {
        let polygon = Geometry::MultiPolygon(vec![vec![square()], vec![square()]]);
        assert_eq!(polygon.family(), GeometryType::Polygon);
        assert_eq!(polygon.coord_count(), 10);
        assert_eq!(polygon.polygons().len(), 2);
        assert!(polygon.lines().is_empty());
        assert!(Geometry::LineString(Vec::new()).is_empty());
    }

    #[test]
    fn geometry_type_parse() {
        assert_eq!("MultiLineString".parse::<GeometryType>().ok(), Some(GeometryType::Polyline));
        assert_eq!("Polygon".parse::<GeometryType>().ok(), Some(GeometryType::Polygon));
        assert!("Raster".parse::<GeometryType>().is_err());
    }
}

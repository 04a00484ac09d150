//! Data model shared by every stage of the CARG conversion pipeline.

pub mod domain;
pub mod error;
pub mod geometry;
pub mod issue;
pub mod lookup;
pub mod record;
pub mod value;

pub use domain::{DomainTable, normalize_code, normalize_code_str};
pub use error::{ModelError, Result};
pub use geometry::{Coord, Geometry, GeometryType};
pub use issue::{GeometryIssue, IssueKind, IssueLedger};
pub use lookup::CaseInsensitiveSet;
pub use record::{AttributeTable, FeatureRecord, FieldMap, OutputLayer, Provenance};
pub use value::FieldValue;

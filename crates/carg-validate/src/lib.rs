//! Geometry diagnostics: classify faults, keep or drop records, build the issue ledger.

pub mod checks;
mod engine;
pub mod error;
pub mod geom;

pub use engine::{Validation, ValidationOptions, feature_id, validate};
pub use error::ValidateError;

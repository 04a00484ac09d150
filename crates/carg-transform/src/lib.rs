//! Field standardization, layer preparation, and merge for CARG layers.
//!
//! Every transformation here is driven by the declarations in
//! `carg-standards`; there is no per-layer code. The flow for one layer is
//! [`prepare`] (renames, domain decoding, auxiliary joins) followed by
//! [`standardize`] against the layer's profile, and for merged outputs a
//! [`merge`] followed by a second `standardize` pass.

pub mod error;
pub mod merge;
pub mod normalization;
pub mod prepare;
pub mod standardize;

pub use error::{Result, TransformError};
pub use merge::{MergeInput, merge};
pub use prepare::{PrepareContext, PrepareReport, Prepared, prepare};
pub use standardize::{StandardizeReport, Standardized, standardize};

#![deny(unsafe_code)]

pub mod config;
pub mod csv_domain;
pub mod domain_cache;
pub mod error;
pub mod layers;
pub mod memory;
pub mod paths;
pub mod profile;
pub mod profiles;

pub use crate::config::{RingConvention, RunConfig};
pub use crate::csv_domain::{CsvDomainDirectory, domain_columns};
pub use crate::domain_cache::{CacheStats, DomainTableCache, DomainTableSource, Fallback, TableLoad};
pub use crate::error::StandardsError;
pub use crate::layers::{
    AuxiliaryColumn, AuxiliaryJoin, FieldRename, LAYER_SPECS, LayerDomain, LayerSpec, MERGE_GROUPS,
    MergeGroup, SommersoRule, layer_spec, merge_group_for,
};
pub use crate::memory::InMemoryDomainTables;
pub use crate::paths::{DOMINI_ENV_VAR, default_output_dir, domini_root};
pub use crate::profile::{DomainRule, FieldKind, StandardizationProfile};
pub use crate::profiles::{OUTPUT_PROFILES, PROFILES, profile};

//! Pipeline orchestration for the CARG conversion.
//!
//! The orchestrator drives every declared CARG layer through
//! `Loaded → DomainMapped → Standardized → (Merged) → Validated → Emitted`,
//! reading from a [`LayerSource`] and writing to a [`LayerSink`]. Both are
//! traits so that a run can be exercised entirely in memory.

#![deny(unsafe_code)]

pub mod error;
pub mod io;
pub mod memory;
pub mod pipeline;
pub mod summary;

pub use error::PipelineError;
pub use io::{LayerSink, LayerSource};
pub use memory::{MemorySink, MemorySource};
pub use pipeline::{PipelineOptions, run};
pub use summary::{
    AnomalyCounts, LayerOutcome, LayerStage, LayerSummary, OutputSummary, RunSummary,
    ledger_digest,
};

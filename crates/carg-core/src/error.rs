use thiserror::Error;

/// Conditions that abort a run before anything is written.
///
/// Layer-local failures are not errors; they end up in the run summary as
/// [`crate::LayerOutcome::Failed`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no record in any layer carries a sheet identifier (FoglioGeologico)")]
    MissingSheetIdentifier,

    #[error("domain table directory not found: {location}")]
    MissingDomainDirectory { location: String },
}

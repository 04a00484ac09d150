use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidateError {
    /// No record of the batch carries a sheet identifier.
    #[error("layer {layer}: no record carries the sheet identifier")]
    MissingSheetIdentifier { layer: String },
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("layer {layer} does not match schema of {output}: missing [{missing}], unexpected [{unexpected}]")]
    SchemaMismatch {
        layer: String,
        output: String,
        missing: String,
        unexpected: String,
    },
    #[error(transparent)]
    Standards(#[from] carg_standards::StandardsError),
}

pub type Result<T> = std::result::Result<T, TransformError>;

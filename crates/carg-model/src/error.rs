use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown geometry type: {0}")]
    UnknownGeometryType(String),
    #[error("unknown issue kind: {0}")]
    UnknownIssueKind(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

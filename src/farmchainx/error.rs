use thiserror::Error;

#[derive(Error, Debug)]
pub enum FarmError {
    #[error("Missing or invalid field: {0}")]
    ValidationFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("No record selected")]
    NoSelection,

    #[error("Nothing to export")]
    EmptyExport,

    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    #[error("Unknown status: {0}")]
    InvalidStatus(String),

    #[error("Invalid or corrupted QR payload: {0}")]
    InvalidPayload(String),

    #[error("Batch {0} is already verified")]
    AlreadyVerified(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FarmError>;

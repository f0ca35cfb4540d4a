use thiserror::Error;
use tracker_domain::{DomainError, RecordId, RecordKind};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid category: {0}")]
    InvalidCategory(String),
    #[error("{kind} record {id} not found")]
    RecordNotFound { kind: RecordKind, id: RecordId },
    #[error("{kind} category `{label}` not found")]
    CategoryNotFound { kind: RecordKind, label: String },
    #[error("{0} categories cannot be empty; keep at least one label")]
    EmptyCategorySetViolation(RecordKind),
    #[error("Failed to read ledger data: {0}")]
    PersistenceRead(String),
    #[error("Failed to write ledger data: {0}")]
    PersistenceWrite(String),
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidAmount(message) => CoreError::InvalidAmount(message),
            other => CoreError::PersistenceRead(other.to_string()),
        }
    }
}

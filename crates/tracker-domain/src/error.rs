use thiserror::Error;

use crate::common::RecordKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("unknown record kind `{0}`")]
    UnknownKind(String),
    #[error("invalid timestamp `{0}`")]
    InvalidTimestamp(String),
    #[error("{0} total exceeds the supported range")]
    TotalOverflow(RecordKind),
}

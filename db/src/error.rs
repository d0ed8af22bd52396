use sea_orm::DbErr;
use thiserror::Error;

/// Domain-level failures surfaced by the stores. The API layer maps each
/// variant onto an HTTP status; anything infrastructural travels through
/// the transparent `Db` variant.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    QuotaExceeded(String),

    #[error("{0}")]
    InvalidState(String),

    #[error(transparent)]
    Db(#[from] DbErr),
}

pub type DomainResult<T> = Result<T, DomainError>;

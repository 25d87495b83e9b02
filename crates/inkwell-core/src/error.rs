//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
///
/// Each variant corresponds to one HTTP status class; the mapping lives in
/// the server's error middleware.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: String },

    #[error("Storage failure: {0}")]
    Storage(RepoError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, key: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Unique-index violations surface as conflicts; everything else is an
/// unclassified storage failure.
impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => DomainError::Conflict(msg),
            other => DomainError::Storage(other),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

use thiserror::Error;

use crate::auth::AccessError;
use crate::jobs::JobError;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Errors returned by the job and application services.
///
/// Cache failures never appear here: the gateway degrades to the store
/// instead of failing the request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Validation(String),
    #[error("Authoritative store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            RepositoryError::AlreadyExists { .. } => Self::Conflict(error.to_string()),
            RepositoryError::ConnectionFailed(msg) => Self::StoreUnavailable(msg),
            RepositoryError::InvalidData(msg) => Self::Validation(msg),
            RepositoryError::QueryFailed(_) | RepositoryError::Serialization(_) => {
                Self::Internal(error.to_string())
            }
        }
    }
}

impl From<AccessError> for ServiceError {
    fn from(error: AccessError) -> Self {
        Self::Forbidden(error.to_string())
    }
}

impl From<JobError> for ServiceError {
    fn from(error: JobError) -> Self {
        Self::Validation(error.to_string())
    }
}

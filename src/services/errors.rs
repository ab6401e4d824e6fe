use thiserror::Error;

use crate::domain::access::DenyReason;
use crate::repository::errors::RepositoryError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures surfaced to route handlers.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The access policy turned the requester away.
    #[error("access denied: {0:?}")]
    AccessDenied(DenyReason),
    #[error("not found")]
    NotFound,
    #[error("conflict")]
    Conflict,
    /// User input failed validation; the message is safe to show.
    #[error("{0}")]
    Form(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Conflict(_) => ServiceError::Conflict,
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<DenyReason> for ServiceError {
    fn from(value: DenyReason) -> Self {
        ServiceError::AccessDenied(value)
    }
}

use thiserror::Error;
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsersDirectoryError {
    #[error("User not found: {id}")]
    NotFound { id: Uuid },

    #[error("User with email '{email}' already exists")]
    Conflict { email: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error")]
    Internal,
}

impl UsersDirectoryError {
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    pub fn conflict(email: impl Into<String>) -> Self {
        Self::Conflict {
            email: email.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<DomainError> for UsersDirectoryError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::UserNotFound { id } => Self::not_found(id),
            DomainError::EmailAlreadyExists { email } => Self::conflict(email),
            DomainError::InvalidEmail { .. }
            | DomainError::MissingFields
            | DomainError::EmptyName
            | DomainError::EmailUnchanged
            | DomainError::InvalidPagination { .. } => Self::validation(e.to_string()),
            DomainError::Storage { .. } => Self::Internal,
        }
    }
}

use thiserror::Error;
use uuid::Uuid;

/// Broad classification used by transport layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Internal,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("User not found")]
    UserNotFound { id: Uuid },

    #[error("User with this email already exists")]
    EmailAlreadyExists { email: String },

    #[error("Invalid email format")]
    InvalidEmail { email: String },

    #[error("Email and name are required")]
    MissingFields,

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Email is the same as current email")]
    EmailUnchanged,

    #[error("Invalid pagination: {message}")]
    InvalidPagination { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn user_not_found(id: Uuid) -> Self {
        Self::UserNotFound { id }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn invalid_email(email: impl Into<String>) -> Self {
        Self::InvalidEmail {
            email: email.into(),
        }
    }

    pub fn invalid_pagination(message: impl Into<String>) -> Self {
        Self::InvalidPagination {
            message: message.into(),
        }
    }

    pub fn storage(e: impl std::fmt::Display) -> Self {
        Self::Storage {
            message: e.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound { .. } => ErrorKind::NotFound,
            Self::EmailAlreadyExists { .. } => ErrorKind::Conflict,
            Self::InvalidEmail { .. }
            | Self::MissingFields
            | Self::EmptyName
            | Self::EmailUnchanged
            | Self::InvalidPagination { .. } => ErrorKind::Validation,
            Self::Storage { .. } => ErrorKind::Internal,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::contract::model::User;

/// Transport-agnostic domain event. Each variant carries the affected record:
/// the stored state after `Created`/`Updated`, the removed state for `Deleted`.
#[derive(Debug, Clone, PartialEq)]
pub enum UserDomainEvent {
    Created { user: User, at: DateTime<Utc> },
    Updated { user: User, at: DateTime<Utc> },
    Deleted { user: User, at: DateTime<Utc> },
}

impl UserDomainEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Updated { .. } => "updated",
            Self::Deleted { .. } => "deleted",
        }
    }

    pub fn user(&self) -> &User {
        match self {
            Self::Created { user, .. }
            | Self::Updated { user, .. }
            | Self::Deleted { user, .. } => user,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user().id
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Self::Created { at, .. } | Self::Updated { at, .. } | Self::Deleted { at, .. } => *at,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::contract::model::{NewUser, Page, User, UserPatch};
use crate::domain::events::UserDomainEvent;
use modkit::PaginationMeta;

/// REST DTO for user representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /users`. Missing fields deserialize as empty strings so the
/// domain reports them as a validation error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateUserReq {
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "Alice")]
    pub name: String,
}

/// Body of `PUT /users/{id}`; absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserReq {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Query of `GET /users`. Without both, the full list is returned.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size, clamped to the configured maximum
    pub limit: Option<u32>,
}

impl ListUsersQuery {
    pub fn is_paged(&self) -> bool {
        self.page.is_some() || self.limit.is_some()
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<CreateUserReq> for NewUser {
    fn from(req: CreateUserReq) -> Self {
        Self {
            email: req.email,
            name: req.name,
        }
    }
}

impl From<UpdateUserReq> for UserPatch {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            email: req.email,
            name: req.name,
        }
    }
}

/// Splits a page into DTO items and envelope metadata.
pub fn page_to_parts(page: Page<User>) -> (Vec<UserDto>, PaginationMeta) {
    let meta = PaginationMeta {
        page: page.page,
        limit: page.limit,
        total: page.total,
        total_pages: page.total_pages,
    };
    (page.map(UserDto::from).items, meta)
}

/// Transport-level SSE payload. `user` is the record after the change, or the
/// removed record for `deleted`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "UserEvent", description = "Server-sent user event")]
pub struct UserEvent {
    pub kind: String,
    pub id: Uuid,
    #[schema(format = "date-time")]
    pub at: DateTime<Utc>,
    pub user: UserDto,
}

impl From<&UserDomainEvent> for UserEvent {
    fn from(e: &UserDomainEvent) -> Self {
        Self {
            kind: e.kind().to_string(),
            id: e.user_id(),
            at: e.at(),
            user: UserDto::from(e.user().clone()),
        }
    }
}

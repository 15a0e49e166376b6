use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::{
    error::UsersDirectoryError,
    model::{NewUser, Page, User, UserPatch},
};

/// Public API of the users_directory module for in-process consumers
#[async_trait]
pub trait UsersDirectoryApi: Send + Sync {
    /// Get a user by ID
    async fn get_user(&self, id: Uuid) -> Result<User, UsersDirectoryError>;

    /// Look up a user by exact email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UsersDirectoryError>;

    /// All users in insertion order
    async fn list_users(&self) -> Result<Vec<User>, UsersDirectoryError>;

    /// One page of users; `None` picks the configured defaults
    async fn list_users_page(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Page<User>, UsersDirectoryError>;

    /// Create a new user
    async fn create_user(&self, new_user: NewUser) -> Result<User, UsersDirectoryError>;

    /// Update a user with partial data
    async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<User, UsersDirectoryError>;

    /// Delete a user by ID
    async fn delete_user(&self, id: Uuid) -> Result<(), UsersDirectoryError>;
}

use crate::contract::model::User;
use async_trait::async_trait;
use uuid::Uuid;

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Load a user by id.
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Load a user by exact email.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    /// Check uniqueness by email.
    async fn email_exists(&self, email: &str) -> anyhow::Result<bool>;
    /// Append a fully-formed user.
    ///
    /// Service computes id/timestamps/validation; repo persists.
    async fn insert(&self, u: User) -> anyhow::Result<()>;
    /// Replace the stored user with the same `u.id`.
    async fn update(&self, u: User) -> anyhow::Result<()>;
    /// Delete by id. Returns the removed record, if there was one.
    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Snapshot of all users in insertion order.
    async fn list_all(&self) -> anyhow::Result<Vec<User>>;
}

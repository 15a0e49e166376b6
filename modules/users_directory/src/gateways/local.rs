use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::UsersDirectoryApi,
    error::UsersDirectoryError,
    model::{NewUser, Page, User, UserPatch},
};
use crate::domain::service::Service;

/// In-process implementation of `UsersDirectoryApi` backed by the domain service
pub struct UsersDirectoryLocalClient {
    service: Arc<Service>,
}

impl UsersDirectoryLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UsersDirectoryApi for UsersDirectoryLocalClient {
    async fn get_user(&self, id: Uuid) -> Result<User, UsersDirectoryError> {
        self.service.get_user(id).await.map_err(Into::into)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UsersDirectoryError> {
        self.service.find_by_email(email).await.map_err(Into::into)
    }

    async fn list_users(&self) -> Result<Vec<User>, UsersDirectoryError> {
        self.service.list_users().await.map_err(Into::into)
    }

    async fn list_users_page(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Page<User>, UsersDirectoryError> {
        self.service
            .list_users_page(page, limit)
            .await
            .map_err(Into::into)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, UsersDirectoryError> {
        self.service.create_user(new_user).await.map_err(Into::into)
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<User, UsersDirectoryError> {
        self.service
            .update_user(id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), UsersDirectoryError> {
        self.service.delete_user(id).await.map_err(Into::into)
    }
}

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::model::{NewUser, Page, User, UserPatch};
use crate::domain::error::DomainError;
use crate::domain::events::UserDomainEvent;
use crate::domain::ports::{EventPublisher, LatencyPort, NoLatency, Operation};
use crate::domain::repo::UsersRepository;
use crate::domain::validation::{self, Changes};

/// What `update_user` does when the supplied email equals the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnchangedEmailPolicy {
    /// Fail with `EmailUnchanged`.
    #[default]
    Reject,
    /// Treat the email as not supplied.
    Ignore,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub unchanged_email: UnchangedEmailPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: 1000,
            unchanged_email: UnchangedEmailPolicy::Reject,
        }
    }
}

/// Domain service with the directory's business rules.
/// Depends only on ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    events: Arc<dyn EventPublisher<UserDomainEvent>>,
    latency: Arc<dyn LatencyPort>,
    config: ServiceConfig,
    // Held across the uniqueness/existence check and the write
    writer: Arc<Mutex<()>>,
}

impl Service {
    /// Create a service with dependencies and no simulated latency.
    pub fn new(
        repo: Arc<dyn UsersRepository>,
        events: Arc<dyn EventPublisher<UserDomainEvent>>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            events,
            latency: Arc::new(NoLatency),
            config,
            writer: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_latency(mut self, latency: Arc<dyn LatencyPort>) -> Self {
        self.latency = latency;
        self
    }

    #[instrument(name = "users_directory.service.get_user", skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        debug!("Getting user by id");
        self.latency.delay(Operation::Get).await;

        let user = self
            .repo
            .find_by_id(id)
            .await
            .map_err(DomainError::storage)?
            .ok_or_else(|| DomainError::user_not_found(id))?;
        debug!("Successfully retrieved user");
        Ok(user)
    }

    #[instrument(name = "users_directory.service.find_by_email", skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.latency.delay(Operation::Get).await;
        self.repo
            .find_by_email(email)
            .await
            .map_err(DomainError::storage)
    }

    #[instrument(name = "users_directory.service.list_users", skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        self.latency.delay(Operation::List).await;
        let users = self.repo.list_all().await.map_err(DomainError::storage)?;
        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    /// 1-based page over the insertion-ordered listing.
    ///
    /// `limit` is clamped to `max_page_size`; a page past the end is empty.
    #[instrument(name = "users_directory.service.list_users_page", skip(self))]
    pub async fn list_users_page(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Page<User>, DomainError> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(DomainError::invalid_pagination("page must be at least 1"));
        }
        let limit = match limit {
            Some(0) => {
                return Err(DomainError::invalid_pagination("limit must be at least 1"));
            }
            Some(l) => l.min(self.config.max_page_size),
            None => self.config.default_page_size,
        };

        self.latency.delay(Operation::List).await;
        let all = self.repo.list_all().await.map_err(DomainError::storage)?;

        let total = all.len() as u64;
        let total_pages = total.div_ceil(u64::from(limit)) as u32;
        let start = (u64::from(page - 1) * u64::from(limit)).min(total) as usize;
        let items: Vec<User> = all.into_iter().skip(start).take(limit as usize).collect();

        debug!(page, limit, total, returned = items.len(), "Listed users page");
        Ok(Page {
            items,
            page,
            limit,
            total,
            total_pages,
        })
    }

    #[instrument(
        name = "users_directory.service.create_user",
        skip(self),
        fields(email = %new_user.email)
    )]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");
        self.latency.delay(Operation::Create).await;

        validation::validate_new_user(&new_user)?;
        let name = validation::normalize_name(&new_user.name)?;

        let _guard = self.writer.lock().await;

        if self
            .repo
            .email_exists(&new_user.email)
            .await
            .map_err(DomainError::storage)?
        {
            return Err(DomainError::email_already_exists(new_user.email));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            name,
            created_at: now,
            updated_at: now,
        };

        self.repo
            .insert(user.clone())
            .await
            .map_err(DomainError::storage)?;

        self.events.publish(&UserDomainEvent::Created {
            at: user.created_at,
            user: user.clone(),
        });

        info!("Successfully created user with id={}", user.id);
        Ok(user)
    }

    /// Existence is checked before the patch is validated, so any patch on an
    /// unknown id fails with `UserNotFound`.
    #[instrument(
        name = "users_directory.service.update_user",
        skip(self),
        fields(user_id = %id)
    )]
    pub async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<User, DomainError> {
        info!("Updating user");
        self.latency.delay(Operation::Update).await;

        let _guard = self.writer.lock().await;

        let current = self
            .repo
            .find_by_id(id)
            .await
            .map_err(DomainError::storage)?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        let changes = self.validate_patch(&current, patch).await?;
        let updated = validation::apply_changes(&current, changes, Utc::now());

        self.repo
            .update(updated.clone())
            .await
            .map_err(DomainError::storage)?;

        self.events.publish(&UserDomainEvent::Updated {
            at: updated.updated_at,
            user: updated.clone(),
        });

        info!("Successfully updated user");
        Ok(updated)
    }

    #[instrument(
        name = "users_directory.service.delete_user",
        skip(self),
        fields(user_id = %id)
    )]
    pub async fn delete_user(&self, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting user");
        self.latency.delay(Operation::Delete).await;

        let removed = {
            let _guard = self.writer.lock().await;
            self.repo.delete(id).await.map_err(DomainError::storage)?
        }
        .ok_or_else(|| DomainError::user_not_found(id))?;

        self.events.publish(&UserDomainEvent::Deleted {
            user: removed,
            at: Utc::now(),
        });

        info!("Successfully deleted user");
        Ok(())
    }

    // --- validation helpers ---

    async fn validate_patch(
        &self,
        current: &User,
        patch: UserPatch,
    ) -> Result<Changes, DomainError> {
        let mut changes = Changes::default();

        if let Some(email) = patch.email {
            validation::validate_email(&email)?;
            if email == current.email {
                match self.config.unchanged_email {
                    UnchangedEmailPolicy::Reject => return Err(DomainError::EmailUnchanged),
                    UnchangedEmailPolicy::Ignore => {
                        debug!("Email unchanged; ignoring");
                    }
                }
            } else if self
                .repo
                .email_exists(&email)
                .await
                .map_err(DomainError::storage)?
            {
                return Err(DomainError::email_already_exists(email));
            } else {
                changes.email = Some(email);
            }
        }

        if let Some(name) = patch.name {
            changes.name = Some(validation::normalize_name(&name)?);
        }

        Ok(changes)
    }
}

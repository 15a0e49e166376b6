use anyhow::bail;
use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::contract::model::User;
use crate::domain::repo::UsersRepository;

/// Process-local store; records keep insertion order.
#[derive(Debug, Default)]
pub struct InMemoryUsersRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUsersRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store, mostly for tests.
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }
}

#[async_trait]
impl UsersRepository for InMemoryUsersRepository {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().iter().find(|u| u.email == email).cloned())
    }

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        Ok(self.users.read().iter().any(|u| u.email == email))
    }

    async fn insert(&self, u: User) -> anyhow::Result<()> {
        let mut users = self.users.write();
        if users.iter().any(|existing| existing.id == u.id) {
            bail!("user {} already stored", u.id);
        }
        users.push(u);
        Ok(())
    }

    async fn update(&self, u: User) -> anyhow::Result<()> {
        let mut users = self.users.write();
        match users.iter_mut().find(|existing| existing.id == u.id) {
            Some(slot) => {
                *slot = u;
                Ok(())
            }
            None => bail!("user {} not stored", u.id),
        }
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write();
        Ok(users
            .iter()
            .position(|u| u.id == id)
            .map(|idx| users.remove(idx)))
    }

    async fn list_all(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.users.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(email: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: "Someone".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn keeps_insertion_order() {
        let repo = InMemoryUsersRepository::new();
        for email in ["c@x.io", "a@x.io", "b@x.io"] {
            repo.insert(user(email)).await.unwrap();
        }

        let emails: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, ["c@x.io", "a@x.io", "b@x.io"]);
    }

    #[tokio::test]
    async fn lookups() {
        let u = user("a@x.io");
        let repo = InMemoryUsersRepository::with_users(vec![u.clone()]);

        assert_eq!(repo.find_by_id(u.id).await.unwrap(), Some(u.clone()));
        assert_eq!(repo.find_by_email("a@x.io").await.unwrap(), Some(u));
        assert!(repo.email_exists("a@x.io").await.unwrap());
        assert!(!repo.email_exists("A@x.io").await.unwrap());
        assert_eq!(repo.find_by_id(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_replaces_in_place() {
        let first = user("a@x.io");
        let second = user("b@x.io");
        let repo = InMemoryUsersRepository::with_users(vec![first.clone(), second.clone()]);

        let renamed = User {
            name: "Renamed".into(),
            ..first.clone()
        };
        repo.update(renamed).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[0].name, "Renamed");
        assert_eq!(all[1], second);
    }

    #[tokio::test]
    async fn update_of_missing_record_fails() {
        let repo = InMemoryUsersRepository::new();
        assert!(repo.update(user("a@x.io")).await.is_err());
    }

    #[tokio::test]
    async fn duplicate_id_insert_fails() {
        let u = user("a@x.io");
        let repo = InMemoryUsersRepository::with_users(vec![u.clone()]);
        assert!(repo.insert(u).await.is_err());
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_returns_removed_record() {
        let a = user("a@x.io");
        let b = user("b@x.io");
        let repo = InMemoryUsersRepository::with_users(vec![a.clone(), b.clone()]);

        assert_eq!(repo.delete(a.id).await.unwrap(), Some(a.clone()));
        assert_eq!(repo.delete(a.id).await.unwrap(), None);
        assert_eq!(repo.list_all().await.unwrap(), vec![b]);
    }
}

//! Credential store kept in process memory

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use authsvc_core::domain::User;
use authsvc_core::error::DomainError;
use authsvc_core::repositories::UserRepository;
use authsvc_shared::utils::{mask_email, normalize_email};

/// Users by id, with a lowercase email index that enforces uniqueness.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: DashMap<Uuid, User>,
    emails: DashMap<String, Uuid>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let Some(id) = self.emails.get(&normalize_email(email)).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        self.find_by_id(&id).await
    }

    async fn find_by_reset_token(&self, reset_token: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.reset_token.as_deref() == Some(reset_token))
            .map(|entry| entry.value().clone()))
    }

    async fn create(&self, user: &User) -> Result<User, DomainError> {
        match self.emails.entry(normalize_email(&user.email)) {
            Entry::Occupied(_) => return Err(DomainError::EmailAlreadyExists(user.email.clone())),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }
        self.users.insert(user.id, user.clone());

        info!("User created: {}", mask_email(&user.email));
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let previous_email = match self.users.get(&user.id) {
            Some(existing) => normalize_email(&existing.email),
            None => return Err(DomainError::UserNotFound),
        };

        let email = normalize_email(&user.email);
        if email != previous_email {
            match self.emails.entry(email) {
                Entry::Occupied(_) => return Err(DomainError::EmailAlreadyExists(user.email.clone())),
                Entry::Vacant(slot) => {
                    slot.insert(user.id);
                }
            }
            self.emails.remove(&previous_email);
        }

        self.users.insert(user.id, user.clone());
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User::new(email.into(), "$2b$04$digest".into()).unwrap()
    }

    #[tokio::test]
    async fn test_email_is_unique_case_insensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create(&user("alice@example.com")).await.unwrap();

        let result = repo.create(&user("ALICE@example.com")).await;
        assert!(matches!(result, Err(DomainError::EmailAlreadyExists(_))));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_lookups() {
        let repo = InMemoryUserRepository::new();
        let mut alice = repo.create(&user("alice@example.com")).await.unwrap();

        assert_eq!(repo.find_by_email("Alice@Example.com").await.unwrap().map(|u| u.id), Some(alice.id));
        assert!(repo.find_by_email("bob@example.com").await.unwrap().is_none());

        alice.issue_reset_token("tok".into());
        repo.update(&alice).await.unwrap();
        assert_eq!(repo.find_by_reset_token("tok").await.unwrap().map(|u| u.id), Some(alice.id));
        assert!(repo.find_by_reset_token("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let repo = InMemoryUserRepository::new();
        assert!(matches!(
            repo.update(&user("ghost@example.com")).await,
            Err(DomainError::UserNotFound)
        ));
    }
}

//! Session store backed by a persistent repository

use std::sync::Arc;

use async_trait::async_trait;

use super::SessionStore;
use crate::domain::SessionRecord;
use crate::error::DomainError;
use crate::repositories::SessionRepository;

/// Every record lives as a row in the session repository, so sessions
/// survive restarts. Wrap in `ExpiringStore` for age-based expiry.
pub struct DurableStore {
    repository: Arc<dyn SessionRepository>,
}

impl DurableStore {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl SessionStore for DurableStore {
    async fn save(&self, record: SessionRecord) -> Result<(), DomainError> {
        self.repository.insert(&record).await
    }

    async fn find(&self, session_id: &str) -> Result<Option<SessionRecord>, DomainError> {
        self.repository.find_by_session_id(session_id).await
    }

    async fn remove(&self, session_id: &str) -> Result<bool, DomainError> {
        self.repository.delete(session_id).await
    }
}

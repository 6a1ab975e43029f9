//! Session repository trait (port) for the durable session store

use async_trait::async_trait;
use crate::domain::SessionRecord;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert(&self, record: &SessionRecord) -> Result<(), DomainError>;
    async fn find_by_session_id(&self, session_id: &str) -> Result<Option<SessionRecord>, DomainError>;
    /// Returns whether a row was deleted.
    async fn delete(&self, session_id: &str) -> Result<bool, DomainError>;
}

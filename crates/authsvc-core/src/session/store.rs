//! Session store capability

use std::sync::Arc;

use async_trait::async_trait;
use authsvc_shared::config::SessionBackend;

use super::{DurableStore, ExpiringStore, InMemoryStore};
use crate::clock::Clock;
use crate::domain::SessionRecord;
use crate::error::DomainError;
use crate::repositories::SessionRepository;

/// Storage for session records. Misses are `Ok(None)` / `Ok(false)`;
/// `Err` is reserved for storage faults.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save(&self, record: SessionRecord) -> Result<(), DomainError>;

    async fn find(&self, session_id: &str) -> Result<Option<SessionRecord>, DomainError>;

    /// Returns whether a record was removed.
    async fn remove(&self, session_id: &str) -> Result<bool, DomainError>;
}

/// Builds the store for `backend`.
///
/// `duration_seconds` is ignored by the plain memory backend. The durable
/// backend needs a `repository`.
pub fn build_store(
    backend: SessionBackend,
    duration_seconds: u64,
    clock: Arc<dyn Clock>,
    repository: Option<Arc<dyn SessionRepository>>,
) -> Result<Arc<dyn SessionStore>, DomainError> {
    let store: Arc<dyn SessionStore> = match backend {
        SessionBackend::Memory => Arc::new(InMemoryStore::new()),
        SessionBackend::ExpiringMemory => Arc::new(ExpiringStore::with_seconds(
            InMemoryStore::new(),
            duration_seconds,
            clock,
        )),
        SessionBackend::Durable => {
            let repository = repository.ok_or_else(|| {
                DomainError::InternalError("durable session store requires a session repository".into())
            })?;
            Arc::new(ExpiringStore::with_seconds(
                DurableStore::new(repository),
                duration_seconds,
                clock,
            ))
        }
    };

    Ok(store)
}

//! Age-checking wrapper around another session store

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tracing::{debug, warn};

use super::{InMemoryStore, SessionStore};
use crate::clock::Clock;
use crate::domain::SessionRecord;
use crate::error::DomainError;

/// Hides records older than `max_age` and purges them on lookup.
/// No background sweep runs; a `None` max age disables expiry.
pub struct ExpiringStore<S> {
    inner: S,
    max_age: Option<Duration>,
    clock: Arc<dyn Clock>,
}

pub type ExpiringInMemoryStore = ExpiringStore<InMemoryStore>;

impl<S: SessionStore> ExpiringStore<S> {
    pub fn new(inner: S, max_age: Option<Duration>, clock: Arc<dyn Clock>) -> Self {
        let max_age = max_age.filter(|age| *age > Duration::zero());
        Self {
            inner,
            max_age,
            clock,
        }
    }

    /// `0` disables expiry.
    pub fn with_seconds(inner: S, seconds: u64, clock: Arc<dyn Clock>) -> Self {
        let max_age = i64::try_from(seconds).ok().and_then(Duration::try_seconds);
        Self::new(inner, max_age, clock)
    }

    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: SessionStore> SessionStore for ExpiringStore<S> {
    async fn save(&self, record: SessionRecord) -> Result<(), DomainError> {
        self.inner.save(record).await
    }

    async fn find(&self, session_id: &str) -> Result<Option<SessionRecord>, DomainError> {
        let Some(record) = self.inner.find(session_id).await? else {
            return Ok(None);
        };
        let Some(max_age) = self.max_age else {
            return Ok(Some(record));
        };

        if !record.is_expired(self.clock.now(), max_age) {
            return Ok(Some(record));
        }

        debug!("Session expired, purging");
        if let Err(e) = self.inner.remove(session_id).await {
            // The record stays hidden either way
            warn!("Failed to purge expired session: {}", e);
        }
        Ok(None)
    }

    async fn remove(&self, session_id: &str) -> Result<bool, DomainError> {
        self.inner.remove(session_id).await
    }
}

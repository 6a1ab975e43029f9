//! Process-local session store

use async_trait::async_trait;
use dashmap::DashMap;

use super::SessionStore;
use crate::domain::SessionRecord;
use crate::error::DomainError;

/// Sessions keyed by id in a sharded map. Lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    sessions: DashMap<String, SessionRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn save(&self, record: SessionRecord) -> Result<(), DomainError> {
        self.sessions.insert(record.session_id.clone(), record);
        Ok(())
    }

    async fn find(&self, session_id: &str) -> Result<Option<SessionRecord>, DomainError> {
        Ok(self.sessions.get(session_id).map(|entry| entry.value().clone()))
    }

    async fn remove(&self, session_id: &str) -> Result<bool, DomainError> {
        Ok(self.sessions.remove(session_id).is_some())
    }
}

//! Session authority: issues, resolves, and destroys session ids

use std::sync::Arc;

use tracing::{debug, info};

use super::SessionStore;
use crate::clock::Clock;
use crate::domain::SessionRecord;
use crate::error::DomainError;

#[derive(Clone)]
pub struct SessionAuthority {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
}

impl SessionAuthority {
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Issues a new session id for `user_id`.
    pub async fn create_session(&self, user_id: &str) -> Result<String, DomainError> {
        if user_id.trim().is_empty() {
            return Err(DomainError::InvalidUser);
        }

        let session_id = authsvc_security::generate_token();
        let record = SessionRecord::new(session_id.clone(), user_id.to_string(), self.clock.now());
        self.store.save(record).await?;

        info!("Session created for user: {}", user_id);
        Ok(session_id)
    }

    /// User id bound to `session_id`, or `None` when the id is unknown,
    /// expired, or empty.
    pub async fn resolve_session(&self, session_id: &str) -> Result<Option<String>, DomainError> {
        if session_id.is_empty() {
            return Ok(None);
        }

        let user_id = self.store.find(session_id).await?.map(|record| record.user_id);
        if user_id.is_none() {
            debug!("Session not resolvable");
        }
        Ok(user_id)
    }

    pub async fn destroy_session(&self, session_id: &str) -> Result<bool, DomainError> {
        if session_id.is_empty() {
            return Ok(false);
        }

        let removed = self.store.remove(session_id).await?;
        if removed {
            info!("Session destroyed");
        }
        Ok(removed)
    }
}

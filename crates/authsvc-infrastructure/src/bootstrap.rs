//! Wiring of the session authority from configuration

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use authsvc_core::clock::Clock;
use authsvc_core::error::DomainError;
use authsvc_core::repositories::{SessionRepository, UserRepository};
use authsvc_core::services::AuthService;
use authsvc_core::session::{build_store, SessionAuthority};
use authsvc_security::PasswordService;
use authsvc_shared::config::{AppConfig, SessionBackend};

use crate::database::{create_pool, run_migrations, PgSessionRepository};

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Auth type {0} does not use sessions")]
    NotSessionAuth(&'static str),

    #[error("database.url is required for the durable session store")]
    MissingDatabaseUrl,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Opens the pool and applies migrations when a database is configured.
pub async fn connect(config: &AppConfig) -> Result<Option<PgPool>, BootstrapError> {
    let Some(url) = config.database.url.as_deref() else {
        return Ok(None);
    };

    let pool = create_pool(url, config.database.max_connections).await?;
    run_migrations(&pool).await?;
    info!("Connected to database");
    Ok(Some(pool))
}

/// Builds the authority for `auth.auth_type`. The durable backend needs
/// `pool`.
pub fn build_session_authority(
    config: &AppConfig,
    pool: Option<PgPool>,
    clock: Arc<dyn Clock>,
) -> Result<SessionAuthority, BootstrapError> {
    let auth_type = config.auth.auth_type;
    let backend = auth_type
        .session_backend()
        .ok_or(BootstrapError::NotSessionAuth(auth_type.as_str()))?;

    let repository: Option<Arc<dyn SessionRepository>> = match backend {
        SessionBackend::Durable => {
            let pool = pool.ok_or(BootstrapError::MissingDatabaseUrl)?;
            Some(Arc::new(PgSessionRepository::new(pool)))
        }
        SessionBackend::Memory | SessionBackend::ExpiringMemory => None,
    };

    let store = build_store(backend, config.session.duration, clock.clone(), repository)?;
    info!(
        "Session authority ready: auth_type={}, duration={}s",
        auth_type.as_str(),
        config.session.duration
    );
    Ok(SessionAuthority::new(store, clock))
}

/// Auth service over `user_repo` hashing with the configured algorithm.
pub fn build_auth_service<R: UserRepository>(
    config: &AppConfig,
    user_repo: Arc<R>,
    sessions: SessionAuthority,
) -> AuthService<R> {
    let passwords = PasswordService::from_settings(&config.auth);
    AuthService::new(user_repo, sessions, passwords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use authsvc_core::clock::ManualClock;
    use chrono::Duration;

    fn config(auth_type: &str, duration: &str) -> AppConfig {
        AppConfig::defaults()
            .unwrap()
            .set_override("auth.auth_type", auth_type)
            .unwrap()
            .set_override("session.duration", duration)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_non_session_auth_type_is_rejected() {
        let clock = Arc::new(ManualClock::default());
        let result = build_session_authority(&config("basic_auth", "0"), None, clock);
        assert!(matches!(result, Err(BootstrapError::NotSessionAuth("basic_auth"))));
    }

    #[test]
    fn test_durable_without_pool_is_rejected() {
        let clock = Arc::new(ManualClock::default());
        let result = build_session_authority(&config("session_db_auth", "60"), None, clock);
        assert!(matches!(result, Err(BootstrapError::MissingDatabaseUrl)));
    }

    #[tokio::test]
    async fn test_expiring_memory_honours_duration() {
        let clock = Arc::new(ManualClock::default());
        let authority =
            build_session_authority(&config("session_exp_auth", "30"), None, clock.clone()).unwrap();
        let sid = authority.create_session("user-1").await.unwrap();

        clock.advance(Duration::seconds(30));
        assert!(authority.resolve_session(&sid).await.unwrap().is_some());
        clock.advance(Duration::seconds(1));
        assert!(authority.resolve_session(&sid).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_plain_memory_ignores_duration() {
        let clock = Arc::new(ManualClock::default());
        let authority =
            build_session_authority(&config("session_auth", "30"), None, clock.clone()).unwrap();
        let sid = authority.create_session("user-1").await.unwrap();

        clock.advance(Duration::hours(1));
        assert!(authority.resolve_session(&sid).await.unwrap().is_some());
    }
}

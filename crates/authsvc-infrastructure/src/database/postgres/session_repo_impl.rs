// ============================================================================
// Authsvc Infrastructure - PostgreSQL Session Repository
// File: crates/authsvc-infrastructure/src/database/postgres/session_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::error;

use authsvc_core::domain::SessionRecord;
use authsvc_core::error::DomainError;
use authsvc_core::repositories::SessionRepository;

/// Rows of `user_sessions`; one per live session.
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SessionRow {
    pub session_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<SessionRow> for SessionRecord {
    fn from(row: SessionRow) -> Self {
        SessionRecord::new(row.session_id, row.user_id, row.created_at)
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn insert(&self, record: &SessionRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO user_sessions (session_id, user_id, created_at)
            VALUES ($1, $2, $3)
            "#
        )
        .bind(&record.session_id)
        .bind(&record.user_id)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error inserting session: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    async fn find_by_session_id(&self, session_id: &str) -> Result<Option<SessionRecord>, DomainError> {
        let row: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT session_id, user_id, created_at
            FROM user_sessions
            WHERE session_id = $1
            "#
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding session: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn delete(&self, session_id: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error deleting session: {}", e);
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(result.rows_affected() > 0)
    }
}

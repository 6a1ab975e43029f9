// ============================================================================
// Authsvc Core - Authentication Service
// File: crates/authsvc-core/src/services/auth_service.rs
// ============================================================================
//! Credential registration and verification, session login/logout, and
//! password reset

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use authsvc_security::basic::parse_authorization_header;
use authsvc_security::PasswordService;
use authsvc_shared::utils::{mask_email, normalize_email};

use crate::domain::User;
use crate::error::DomainError;
use crate::repositories::UserRepository;
use crate::session::SessionAuthority;

/// Authentication service sitting on top of the credential store and the
/// session authority
pub struct AuthService<R: UserRepository> {
    user_repo: Arc<R>,
    sessions: SessionAuthority,
    passwords: PasswordService,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repo: Arc<R>, sessions: SessionAuthority, passwords: PasswordService) -> Self {
        Self {
            user_repo,
            sessions,
            passwords,
        }
    }

    /// Register a new user
    pub async fn register(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let email = normalize_email(email);
        info!("Registration attempt for email: {}", mask_email(&email));

        if password.is_empty() {
            return Err(DomainError::ValidationError("password must not be empty".into()));
        }

        // 1. Check if email already exists
        if self.user_repo.find_by_email(&email).await?.is_some() {
            warn!("Registration failed: email already exists: {}", mask_email(&email));
            return Err(DomainError::EmailAlreadyExists(email));
        }

        // 2. Hash password
        let password_hash = self
            .passwords
            .hash(password)
            .map_err(|e| DomainError::PasswordHashError(e.to_string()))?;

        // 3. Create user entity
        let user = User::new(email, password_hash)
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        // 4. Save
        let created = self.user_repo.create(&user).await?;

        info!("Registration successful for: {}", mask_email(&created.email));
        Ok(created)
    }

    /// Whether `password` matches the digest stored for `email`
    pub async fn verify(&self, email: &str, password: &str) -> Result<bool, DomainError> {
        Ok(self.authenticate(email, password).await?.is_some())
    }

    /// Verify credentials and open a session; returns the session id
    pub async fn login(&self, email: &str, password: &str) -> Result<String, DomainError> {
        let user = self
            .authenticate(email, password)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        let session_id = self.sessions.create_session(&user.principal_id()).await?;
        info!("Login successful for: {}", mask_email(&user.email));
        Ok(session_id)
    }

    /// User owning `session_id`, if the session is live
    pub async fn current_user(&self, session_id: &str) -> Result<Option<User>, DomainError> {
        let Some(user_id) = self.sessions.resolve_session(session_id).await? else {
            return Ok(None);
        };
        let Ok(id) = Uuid::parse_str(&user_id) else {
            warn!("Session bound to a non-UUID principal");
            return Ok(None);
        };
        self.user_repo.find_by_id(&id).await
    }

    pub async fn logout(&self, session_id: &str) -> Result<bool, DomainError> {
        self.sessions.destroy_session(session_id).await
    }

    /// Issue a reset token for an existing user
    pub async fn reset_password_token(&self, email: &str) -> Result<String, DomainError> {
        let email = normalize_email(email);
        let mut user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        let token = authsvc_security::generate_token();
        user.issue_reset_token(token.clone());
        self.user_repo.update(&user).await?;

        info!("Reset token issued for: {}", mask_email(&email));
        Ok(token)
    }

    /// Set a new password for the holder of `reset_token`; the token is
    /// consumed
    pub async fn update_password(&self, reset_token: &str, new_password: &str) -> Result<(), DomainError> {
        if reset_token.is_empty() {
            return Err(DomainError::InvalidResetToken);
        }
        if new_password.is_empty() {
            return Err(DomainError::ValidationError("password must not be empty".into()));
        }

        let mut user = self
            .user_repo
            .find_by_reset_token(reset_token)
            .await?
            .ok_or(DomainError::InvalidResetToken)?;

        let password_hash = self
            .passwords
            .hash(new_password)
            .map_err(|e| DomainError::PasswordHashError(e.to_string()))?;
        user.set_password(password_hash);
        self.user_repo.update(&user).await?;

        info!("Password updated for: {}", mask_email(&user.email));
        Ok(())
    }

    /// User named by a `Basic` authorization header whose password checks out
    pub async fn user_from_basic_auth(&self, authorization: Option<&str>) -> Result<Option<User>, DomainError> {
        let Some(credentials) = authorization.and_then(parse_authorization_header) else {
            return Ok(None);
        };
        self.authenticate(&credentials.email, &credentials.password).await
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, DomainError> {
        let email = normalize_email(email);
        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            warn!("Authentication failed: email not found: {}", mask_email(&email));
            return Ok(None);
        };

        match self.passwords.verify(password, &user.hashed_password) {
            Ok(true) => Ok(Some(user)),
            Ok(false) => {
                warn!("Authentication failed: invalid password for: {}", mask_email(&email));
                Ok(None)
            }
            Err(e) => {
                warn!("Authentication failed: unreadable digest for {}: {}", mask_email(&email), e);
                Ok(None)
            }
        }
    }
}

/// Public view of a user
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub id: Uuid,
    pub email: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::repositories::user_repository::MockUserRepository;
    use crate::session::InMemoryStore;
    use authsvc_shared::config::PasswordAlgorithm;
    use mockall::predicate::eq;

    fn passwords() -> PasswordService {
        PasswordService::new(PasswordAlgorithm::Bcrypt, 4)
    }

    fn service(repo: MockUserRepository) -> AuthService<MockUserRepository> {
        let sessions = SessionAuthority::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(ManualClock::default()),
        );
        AuthService::new(Arc::new(repo), sessions, passwords())
    }

    fn stored_user(email: &str, password: &str) -> User {
        let digest = passwords().hash(password).unwrap();
        User::new(email.to_string(), digest).unwrap()
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("alice@example.com"))
            .returning(|_| Ok(None));
        repo.expect_create().times(1).returning(|user| Ok(user.clone()));

        let user = service(repo).register("Alice@Example.com", "pw123").await.unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert_ne!(user.hashed_password, "pw123");
        assert!(passwords().verify("pw123", &user.hashed_password).unwrap());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let existing = stored_user("alice@example.com", "pw123");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_create().never();

        let result = service(repo).register("alice@example.com", "other").await;
        assert!(matches!(result, Err(DomainError::EmailAlreadyExists(email)) if email == "alice@example.com"));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_input() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create().never();
        let service = service(repo);

        assert!(matches!(
            service.register("alice@example.com", "").await,
            Err(DomainError::ValidationError(_))
        ));
        assert!(matches!(
            service.register("not-an-email", "pw123").await,
            Err(DomainError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_verify() {
        let existing = stored_user("alice@example.com", "pw123");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("alice@example.com"))
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_find_by_email().returning(|_| Ok(None));
        let service = service(repo);

        assert!(service.verify("alice@example.com", "pw123").await.unwrap());
        assert!(!service.verify("alice@example.com", "wrong").await.unwrap());
        assert!(!service.verify("nobody@example.com", "pw123").await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_unreadable_digest_is_false() {
        let broken = User::new("bob@example.com".into(), "plaintext".into()).unwrap();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(broken.clone())));

        assert!(!service(repo).verify("bob@example.com", "plaintext").await.unwrap());
    }

    #[tokio::test]
    async fn test_login_profile_logout() {
        let existing = stored_user("alice@example.com", "pw123");
        let id = existing.id;
        let by_email = existing.clone();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(by_email.clone())));
        repo.expect_find_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(existing.clone())));
        let service = service(repo);

        assert!(matches!(
            service.login("alice@example.com", "wrong").await,
            Err(DomainError::InvalidCredentials)
        ));

        let sid = service.login("alice@example.com", "pw123").await.unwrap();
        let profile = service.current_user(&sid).await.unwrap().unwrap();
        assert_eq!(UserInfo::from(&profile).id, id);

        assert!(service.logout(&sid).await.unwrap());
        assert!(service.current_user(&sid).await.unwrap().is_none());
        assert!(!service.logout(&sid).await.unwrap());
    }

    #[tokio::test]
    async fn test_reset_token_unknown_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        assert!(matches!(
            service(repo).reset_password_token("ghost@example.com").await,
            Err(DomainError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_reset_token_is_stored() {
        let existing = stored_user("alice@example.com", "pw123");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_update()
            .withf(|user| user.reset_token.is_some())
            .times(1)
            .returning(|user| Ok(user.clone()));

        let token = service(repo).reset_password_token("alice@example.com").await.unwrap();
        assert!(Uuid::parse_str(&token).is_ok());
    }

    #[tokio::test]
    async fn test_update_password() {
        let mut holder = stored_user("alice@example.com", "pw123");
        holder.issue_reset_token("reset-1".into());
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_reset_token()
            .with(eq("reset-1"))
            .returning(move |_| Ok(Some(holder.clone())));
        repo.expect_find_by_reset_token().returning(|_| Ok(None));
        repo.expect_update()
            .withf(|user| {
                user.reset_token.is_none()
                    && PasswordService::default().verify("new-pw", &user.hashed_password).unwrap_or(false)
            })
            .times(1)
            .returning(|user| Ok(user.clone()));
        let service = service(repo);

        service.update_password("reset-1", "new-pw").await.unwrap();
        assert!(matches!(
            service.update_password("stale", "new-pw").await,
            Err(DomainError::InvalidResetToken)
        ));
        assert!(matches!(
            service.update_password("", "new-pw").await,
            Err(DomainError::InvalidResetToken)
        ));
    }

    #[tokio::test]
    async fn test_user_from_basic_auth() {
        let existing = stored_user("bob@example.com", "pa:ss");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("bob@example.com"))
            .returning(move |_| Ok(Some(existing.clone())));
        let service = service(repo);

        // "bob@example.com:pa:ss"
        let header = "Basic Ym9iQGV4YW1wbGUuY29tOnBhOnNz";
        let user = service.user_from_basic_auth(Some(header)).await.unwrap();
        assert_eq!(user.map(|u| u.email).as_deref(), Some("bob@example.com"));

        assert!(service.user_from_basic_auth(None).await.unwrap().is_none());
        assert!(service.user_from_basic_auth(Some("Bearer abc")).await.unwrap().is_none());
    }
}

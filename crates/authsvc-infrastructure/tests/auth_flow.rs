use std::sync::Arc;

use authsvc_core::clock::ManualClock;
use authsvc_core::error::DomainError;
use authsvc_core::services::{AuthService, UserInfo};
use authsvc_infrastructure::{build_auth_service, build_session_authority, InMemoryUserRepository};
use authsvc_shared::AppConfig;
use chrono::Duration;

fn config(overrides: &[(&str, &str)]) -> AppConfig {
    let mut builder = AppConfig::defaults().unwrap().set_override("auth.bcrypt_cost", 4_i64).unwrap();
    for (key, value) in overrides {
        builder = builder.set_override(*key, *value).unwrap();
    }
    builder.build().unwrap().try_deserialize().unwrap()
}

fn service(config: &AppConfig, clock: Arc<ManualClock>) -> AuthService<InMemoryUserRepository> {
    let sessions = build_session_authority(config, None, clock).unwrap();
    build_auth_service(config, Arc::new(InMemoryUserRepository::new()), sessions)
}

#[tokio::test]
async fn test_register_and_verify() {
    let service = service(&config(&[]), Arc::new(ManualClock::default()));

    service.register("alice@example.com", "pw123").await.unwrap();
    assert!(matches!(
        service.register("alice@example.com", "pw123").await,
        Err(DomainError::EmailAlreadyExists(_))
    ));

    assert!(service.verify("alice@example.com", "pw123").await.unwrap());
    assert!(!service.verify("alice@example.com", "wrong").await.unwrap());
}

#[tokio::test]
async fn test_full_session_scenario() {
    let clock = Arc::new(ManualClock::default());
    let service = service(&config(&[("auth.auth_type", "session_exp_auth")]), clock);
    let email = "guillaume@holberton.io";

    let registered = service.register(email, "b4l0u").await.unwrap();

    assert!(matches!(
        service.login(email, "wrong").await,
        Err(DomainError::InvalidCredentials)
    ));
    assert!(service.current_user("not-a-session").await.unwrap().is_none());

    let session_id = service.login(email, "b4l0u").await.unwrap();
    let profile = service.current_user(&session_id).await.unwrap().unwrap();
    assert_eq!(UserInfo::from(&profile).id, registered.id);
    assert_eq!(profile.email, email);

    assert!(service.logout(&session_id).await.unwrap());
    assert!(service.current_user(&session_id).await.unwrap().is_none());

    let reset_token = service.reset_password_token(email).await.unwrap();
    service.update_password(&reset_token, "t4rt1fl3tt3").await.unwrap();
    assert!(matches!(
        service.update_password(&reset_token, "again").await,
        Err(DomainError::InvalidResetToken)
    ));

    assert!(matches!(
        service.login(email, "b4l0u").await,
        Err(DomainError::InvalidCredentials)
    ));
    let session_id = service.login(email, "t4rt1fl3tt3").await.unwrap();
    assert!(service.current_user(&session_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_session_expires_with_configured_duration() {
    let clock = Arc::new(ManualClock::default());
    let config = config(&[("auth.auth_type", "session_exp_auth"), ("session.duration", "60")]);
    let service = service(&config, clock.clone());

    service.register("bob@example.com", "secret").await.unwrap();
    let session_id = service.login("bob@example.com", "secret").await.unwrap();

    clock.advance(Duration::seconds(59));
    assert!(service.current_user(&session_id).await.unwrap().is_some());

    clock.advance(Duration::seconds(2));
    assert!(service.current_user(&session_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_argon2_and_basic_auth() {
    let config = config(&[("auth.password_algorithm", "argon2")]);
    let service = service(&config, Arc::new(ManualClock::default()));

    let user = service.register("carol@example.com", "hunter2").await.unwrap();
    assert!(user.hashed_password.starts_with("$argon2"));

    // "carol@example.com:hunter2"
    let header = "Basic Y2Fyb2xAZXhhbXBsZS5jb206aHVudGVyMg==";
    let found = service.user_from_basic_auth(Some(header)).await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));
}

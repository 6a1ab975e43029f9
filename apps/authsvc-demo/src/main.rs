use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use authsvc_core::clock::SystemClock;
use authsvc_core::error::DomainError;
use authsvc_core::repositories::UserRepository;
use authsvc_core::services::{AuthService, UserInfo};
use authsvc_infrastructure::{
    build_auth_service, build_session_authority, connect, InMemoryUserRepository, PgUserRepository,
};
use authsvc_security::{require_auth, session_cookie};
use authsvc_shared::config::AppConfig;

const EMAIL: &str = "guillaume@holberton.io";
const PASSWD: &str = "b4l0u";
const NEW_PASSWD: &str = "t4rt1fl3tt3";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize telemetry; the guard flushes file logs on drop
    let _guard = authsvc_shared::telemetry::init_telemetry(&config.log)?;

    info!("{} starting (env={})", config.app.name, config.app.env);

    let pool = connect(&config).await?;
    let sessions = build_session_authority(&config, pool.clone(), Arc::new(SystemClock))?;

    match pool {
        Some(pool) => {
            let service = build_auth_service(&config, Arc::new(PgUserRepository::new(pool)), sessions);
            run_scenario(&config, &service).await?;
        }
        None => {
            let service = build_auth_service(&config, Arc::new(InMemoryUserRepository::new()), sessions);
            run_scenario(&config, &service).await?;
        }
    }

    info!("Scenario complete");
    Ok(())
}

/// Register, log in, read the profile, log out, then reset the password
/// and log in again.
async fn run_scenario<R: UserRepository>(config: &AppConfig, service: &AuthService<R>) -> anyhow::Result<()> {
    match service.register(EMAIL, PASSWD).await {
        Ok(user) => info!("Registered user {}", user.id),
        Err(DomainError::EmailAlreadyExists(_)) => {
            // Left over from an earlier run against the same database
            warn!("User already registered, restoring the initial password");
            let token = service.reset_password_token(EMAIL).await?;
            service.update_password(&token, PASSWD).await?;
        }
        Err(e) => return Err(e.into()),
    }

    match service.login(EMAIL, "wrong").await {
        Err(DomainError::InvalidCredentials) => info!("Wrong password rejected"),
        other => anyhow::bail!("wrong password was not rejected: {:?}", other.map(|_| ())),
    }

    let session_id = service.login(EMAIL, PASSWD).await?;
    let cookie_header = format!("{}={}", config.session.cookie_name, session_id);

    let profile_path = "/api/v1/users/me";
    if require_auth(Some(profile_path), &config.auth.excluded_paths) {
        let sid = session_cookie(Some(cookie_header.as_str()), &config.session.cookie_name).unwrap_or_default();
        let profile = service
            .current_user(sid)
            .await?
            .map(|user| UserInfo::from(&user))
            .context("session did not resolve to a user")?;
        info!("Profile for session: id={}", profile.id);
    }

    anyhow::ensure!(service.logout(&session_id).await?, "logout removed no session");
    anyhow::ensure!(
        service.current_user(&session_id).await?.is_none(),
        "session still valid after logout"
    );
    info!("Logged out");

    let reset_token = service.reset_password_token(EMAIL).await?;
    service.update_password(&reset_token, NEW_PASSWD).await?;
    info!("Password updated");

    let session_id = service.login(EMAIL, NEW_PASSWD).await?;
    service.logout(&session_id).await?;
    info!("Logged in with the new password");

    Ok(())
}

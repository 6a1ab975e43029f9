//! Configuration management

use std::fmt;

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{de, Deserialize, Deserializer};

use crate::constants::{
    DEFAULT_BCRYPT_COST, DEFAULT_DB_MAX_CONNECTIONS, DEFAULT_EXCLUDED_PATHS,
    DEFAULT_LOG_SEPARATOR, DEFAULT_SESSION_COOKIE_NAME, PII_FIELDS,
};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub session: SessionSettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    /// Required only by the durable session backend.
    #[serde(default)]
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    pub auth_type: AuthType,
    pub excluded_paths: Vec<String>,
    pub password_algorithm: PasswordAlgorithm,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    /// Session lifetime in seconds, 0 disables age-based expiry.
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub duration: u64,
    pub cookie_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
    pub redact_fields: Vec<String>,
    pub redact_separator: String,
    /// When set, logs go to a daily rolling file in this directory.
    #[serde(default)]
    pub directory: Option<String>,
}

/// Authentication scheme, named after the `AUTH_TYPE` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum AuthType {
    Auth,
    BasicAuth,
    SessionAuth,
    SessionExpAuth,
    SessionDbAuth,
}

impl AuthType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::Auth => "auth",
            AuthType::BasicAuth => "basic_auth",
            AuthType::SessionAuth => "session_auth",
            AuthType::SessionExpAuth => "session_exp_auth",
            AuthType::SessionDbAuth => "session_db_auth",
        }
    }

    /// Session store backing this scheme, `None` for stateless schemes.
    pub fn session_backend(&self) -> Option<SessionBackend> {
        match self {
            AuthType::Auth | AuthType::BasicAuth => None,
            AuthType::SessionAuth => Some(SessionBackend::Memory),
            AuthType::SessionExpAuth => Some(SessionBackend::ExpiringMemory),
            AuthType::SessionDbAuth => Some(SessionBackend::Durable),
        }
    }
}

impl From<String> for AuthType {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "basic_auth" => AuthType::BasicAuth,
            "session_auth" => AuthType::SessionAuth,
            "session_exp_auth" => AuthType::SessionExpAuth,
            "session_db_auth" => AuthType::SessionDbAuth,
            _ => AuthType::Auth,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    Memory,
    ExpiringMemory,
    Durable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordAlgorithm {
    #[default]
    Bcrypt,
    Argon2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::defaults()?
            .set_default("app.env", env.as_str())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("auth.excluded_paths")
                    .with_list_parse_key("log.redact_fields")
                    .try_parsing(true),
            )
            // Flat variable names used by existing deployments
            .set_override_option("auth.auth_type", std::env::var("AUTH_TYPE").ok())?
            .set_override_option("session.duration", std::env::var("SESSION_DURATION").ok())?
            .set_override_option("session.cookie_name", std::env::var("SESSION_NAME").ok())?
            .build()?;
        config.try_deserialize()
    }

    /// Builder pre-populated with every default, without any external source.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.name", "authsvc")?
            .set_default("database.max_connections", i64::from(DEFAULT_DB_MAX_CONNECTIONS))?
            .set_default("auth.auth_type", AuthType::SessionAuth.as_str())?
            .set_default("auth.excluded_paths", DEFAULT_EXCLUDED_PATHS.to_vec())?
            .set_default("auth.password_algorithm", "bcrypt")?
            .set_default("auth.bcrypt_cost", i64::from(DEFAULT_BCRYPT_COST))?
            .set_default("session.duration", 0_i64)?
            .set_default("session.cookie_name", DEFAULT_SESSION_COOKIE_NAME)?
            .set_default("log.level", "info")?
            .set_default("log.format", "json")?
            .set_default("log.redact_fields", PII_FIELDS.to_vec())?
            .set_default("log.redact_separator", DEFAULT_LOG_SEPARATOR)
    }
}

/// Parses a duration in whole seconds; anything unusable is 0.
pub fn parse_seconds(raw: &str) -> u64 {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|v| u64::try_from(v).ok())
        .unwrap_or(0)
}

fn lenient_seconds<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct SecondsVisitor;

    impl<'de> de::Visitor<'de> for SecondsVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number of seconds")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
            Ok(u64::try_from(v).unwrap_or(0))
        }

        fn visit_f64<E: de::Error>(self, _v: f64) -> Result<u64, E> {
            Ok(0)
        }

        fn visit_bool<E: de::Error>(self, _v: bool) -> Result<u64, E> {
            Ok(0)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
            Ok(parse_seconds(v))
        }

        fn visit_unit<E: de::Error>(self) -> Result<u64, E> {
            Ok(0)
        }

        fn visit_none<E: de::Error>(self) -> Result<u64, E> {
            Ok(0)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<u64, D::Error> {
            d.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(SecondsVisitor)
}

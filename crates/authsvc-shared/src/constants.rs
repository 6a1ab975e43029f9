//! Application-wide constants

/// Cookie carrying the session id when `SESSION_NAME` is not configured.
pub const DEFAULT_SESSION_COOKIE_NAME: &str = "_my_session_id";

/// Paths reachable without authentication unless configured otherwise.
pub const DEFAULT_EXCLUDED_PATHS: [&str; 4] = [
    "/api/v1/status/",
    "/api/v1/unauthorized/",
    "/api/v1/forbidden/",
    "/api/v1/auth_session/login/",
];

/// Log record fields treated as personally identifiable information.
pub const PII_FIELDS: [&str; 5] = ["name", "email", "phone", "ssn", "password"];
pub const DEFAULT_REDACTION: &str = "***";
pub const DEFAULT_LOG_SEPARATOR: &str = ";";

pub const DEFAULT_BCRYPT_COST: u32 = 12;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

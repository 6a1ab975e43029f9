//! # Authsvc Shared
//! 
//! Shared configuration, telemetry, PII redaction and small helpers used
//! by every authsvc crate.

pub mod constants;
pub mod utils;
pub mod redact;
pub mod telemetry;
pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::AppError;
pub use redact::{redact, Redactor};

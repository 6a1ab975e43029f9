//! # Authsvc Infrastructure
//! 
//! PostgreSQL and in-memory adapters, plus composition from configuration.

pub mod bootstrap;
pub mod database;
pub mod memory;

pub use bootstrap::{build_auth_service, build_session_authority, connect, BootstrapError};
pub use database::{create_pool, run_migrations, PgSessionRepository, PgUserRepository};
pub use memory::InMemoryUserRepository;

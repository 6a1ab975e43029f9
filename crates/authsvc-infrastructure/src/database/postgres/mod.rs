//! PostgreSQL repository implementations

pub mod user_repo_impl;
pub mod session_repo_impl;

pub use user_repo_impl::PgUserRepository;
pub use session_repo_impl::PgSessionRepository;

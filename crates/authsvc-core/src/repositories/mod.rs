//! Repository traits (ports)

pub mod user_repository;
pub mod session_repository;

pub use user_repository::UserRepository;
pub use session_repository::SessionRepository;

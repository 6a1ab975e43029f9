//! # Authsvc Core - Domain Module
//! 
//! Domain entities for the authentication toolkit.

pub mod user;
pub mod session;

// Re-export all entities
pub use user::User;
pub use session::SessionRecord;

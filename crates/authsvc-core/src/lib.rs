//! # Authsvc Core
//! 
//! Domain entities, the session authority and its stores, services, and
//! repository traits.

pub mod clock;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;
pub mod session;

// Re-export domain entities
pub use clock::{Clock, ManualClock, SystemClock};
pub use domain::{SessionRecord, User};
pub use error::DomainError;
pub use session::{SessionAuthority, SessionStore};

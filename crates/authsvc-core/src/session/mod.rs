//! Session lifecycle: the authority and its pluggable stores

pub mod authority;
pub mod durable;
pub mod expiring;
pub mod memory;
pub mod store;

pub use authority::SessionAuthority;
pub use durable::DurableStore;
pub use expiring::{ExpiringInMemoryStore, ExpiringStore};
pub use memory::InMemoryStore;
pub use store::{build_store, SessionStore};

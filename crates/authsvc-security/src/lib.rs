//! # Authsvc Security
//! 
//! Security utilities: password hashing, Basic credentials, access paths,
//! cookies and opaque tokens.

pub mod password;
pub mod basic;
pub mod access;
pub mod token;

pub use password::{PasswordError, PasswordService};
pub use basic::Credentials;
pub use access::{require_auth, session_cookie};
pub use token::generate_token;

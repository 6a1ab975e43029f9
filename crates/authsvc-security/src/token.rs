//! Opaque token generation

use uuid::Uuid;

/// 128-bit random token in canonical UUID form, drawn from the OS CSPRNG.
pub fn generate_token() -> String {
    Uuid::new_v4().to_string()
}

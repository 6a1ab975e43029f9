//! HTTP Basic authorization header parsing

use base64::{engine::general_purpose::STANDARD, Engine};

const BASIC_SCHEME: &str = "Basic ";

/// Email/password pair carried by a Basic authorization header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Returns the Base64 part of `Basic <token>`.
pub fn extract_base64_authorization_header(header: &str) -> Option<&str> {
    header.strip_prefix(BASIC_SCHEME)
}

/// Decodes the Base64 token into UTF-8 text.
pub fn decode_base64_authorization_header(encoded: &str) -> Option<String> {
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    String::from_utf8(bytes).ok()
}

/// Splits `email:password` on the first colon; passwords may contain colons.
pub fn extract_user_credentials(decoded: &str) -> Option<(&str, &str)> {
    decoded.split_once(':')
}

/// Full pipeline from raw header value to credentials.
pub fn parse_authorization_header(header: &str) -> Option<Credentials> {
    let encoded = extract_base64_authorization_header(header)?;
    let decoded = decode_base64_authorization_header(encoded)?;
    let (email, password) = extract_user_credentials(&decoded)?;
    Some(Credentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}

//! Password hashing with bcrypt or Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use authsvc_shared::config::{AuthSettings, PasswordAlgorithm};
use authsvc_shared::constants::DEFAULT_BCRYPT_COST;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
    #[error("Unrecognised digest format")]
    UnknownFormat,
}

#[derive(Debug, Clone)]
pub struct PasswordService {
    algorithm: PasswordAlgorithm,
    bcrypt_cost: u32,
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(PasswordAlgorithm::Bcrypt, DEFAULT_BCRYPT_COST)
    }
}

impl PasswordService {
    pub fn new(algorithm: PasswordAlgorithm, bcrypt_cost: u32) -> Self {
        Self {
            algorithm,
            bcrypt_cost,
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(settings.password_algorithm, settings.bcrypt_cost)
    }

    pub fn algorithm(&self) -> PasswordAlgorithm {
        self.algorithm
    }

    /// Salts and hashes `password` with the configured algorithm.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        match self.algorithm {
            PasswordAlgorithm::Bcrypt => bcrypt::hash(password, self.bcrypt_cost)
                .map_err(|e| PasswordError::HashError(e.to_string())),
            PasswordAlgorithm::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map(|h| h.to_string())
                    .map_err(|e| PasswordError::HashError(e.to_string()))
            }
        }
    }

    /// Checks `password` against a stored digest of either format.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        match detect_algorithm(hash) {
            Some(PasswordAlgorithm::Bcrypt) => bcrypt::verify(password, hash)
                .map_err(|e| PasswordError::HashError(e.to_string())),
            Some(PasswordAlgorithm::Argon2) => {
                let parsed_hash = PasswordHash::new(hash)
                    .map_err(|e| PasswordError::HashError(e.to_string()))?;
                Ok(Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok())
            }
            None => Err(PasswordError::UnknownFormat),
        }
    }
}

fn detect_algorithm(hash: &str) -> Option<PasswordAlgorithm> {
    if hash.starts_with("$argon2") {
        Some(PasswordAlgorithm::Argon2)
    } else if ["$2a$", "$2b$", "$2x$", "$2y$"]
        .iter()
        .any(|prefix| hash.starts_with(prefix))
    {
        Some(PasswordAlgorithm::Bcrypt)
    } else {
        None
    }
}

//! User domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: Uuid,

    #[validate(email)]
    pub email: String,

    #[serde(skip_serializing)]
    pub hashed_password: String,

    #[serde(skip_serializing)]
    pub reset_token: Option<String>,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(email: String, hashed_password: String) -> Result<Self, validator::ValidationErrors> {
        let user = Self {
            id: Uuid::new_v4(),
            email,
            hashed_password,
            reset_token: None,
            created_at: Utc::now(),
            modified_at: None,
        };

        user.validate()?;
        Ok(user)
    }

    /// Canonical identifier handed to the session authority.
    pub fn principal_id(&self) -> String {
        self.id.to_string()
    }

    pub fn issue_reset_token(&mut self, token: String) {
        self.reset_token = Some(token);
        self.modified_at = Some(Utc::now());
    }

    /// Replaces the digest and consumes any pending reset token.
    pub fn set_password(&mut self, hashed_password: String) {
        self.hashed_password = hashed_password;
        self.reset_token = None;
        self.modified_at = Some(Utc::now());
    }
}

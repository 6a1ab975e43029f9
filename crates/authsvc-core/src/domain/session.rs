//! Session record entity

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Binding between an issued session id and a principal. Never mutated;
/// expiry is derived from `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(session_id: String, user_id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            session_id,
            user_id,
            created_at,
        }
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }

    /// Expired once `now` is strictly past `created_at + max_age`.
    /// A non-positive `max_age` never expires.
    pub fn is_expired(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        if max_age <= Duration::zero() {
            return false;
        }
        match self.created_at.checked_add_signed(max_age) {
            Some(expires_at) => now > expires_at,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(created_at: DateTime<Utc>) -> SessionRecord {
        SessionRecord::new("sid".into(), "uid".into(), created_at)
    }

    #[test]
    fn test_expiry_boundary_is_strict() {
        let t0 = Utc::now();
        let rec = record(t0);
        let max_age = Duration::seconds(60);

        assert!(!rec.is_expired(t0 + Duration::seconds(59), max_age));
        assert!(!rec.is_expired(t0 + Duration::seconds(60), max_age));
        assert!(rec.is_expired(t0 + Duration::seconds(61), max_age));
    }

    #[test]
    fn test_zero_max_age_never_expires() {
        let t0 = Utc::now();
        let rec = record(t0);
        assert!(!rec.is_expired(t0 + Duration::days(3650), Duration::zero()));
    }

    #[test]
    fn test_age() {
        let t0 = Utc::now();
        assert_eq!(record(t0).age(t0 + Duration::seconds(5)), Duration::seconds(5));
    }
}

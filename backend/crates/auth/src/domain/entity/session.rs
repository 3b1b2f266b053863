//! Session Entity
//!
//! Browser session bound to one user. Immutable once issued; logout
//! deletes the row and expiry is checked lazily on read.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{
    session_id::{SessionId, new_session_id},
    user_id::UserId,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub session_id: SessionId,
    pub user_id: UserId,
    /// Expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// Cookie `Domain` the session was issued for
    pub domain: String,
    /// Whether the cookie was issued with `Secure`
    pub secure: bool,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Issue a new session with a random identifier
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn issue(user_id: UserId, ttl: Duration, domain: impl Into<String>, secure: bool) -> Self {
        let now = Utc::now();

        Self {
            session_id: new_session_id(),
            user_id,
            expires_at_ms: (now + ttl).timestamp_millis(),
            domain: domain.into(),
            secure,
            created_at: now,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() > self.expires_at_ms
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Remaining lifetime in whole seconds, for cookie `Max-Age`
    pub fn remaining_secs(&self) -> i64 {
        let now_ms = Utc::now().timestamp_millis();
        ((self.expires_at_ms - now_ms) / 1000).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_id::new_user_id;

    #[test]
    fn test_issue_sets_expiry_from_ttl() {
        let session = Session::issue(new_user_id(), Duration::days(30), "example.com", true);
        assert!(!session.session_id.is_blank());
        assert!(!session.is_expired());

        let later = session.created_at + Duration::days(30) + Duration::seconds(1);
        assert!(session.is_expired_at(later));
    }

    #[test]
    fn test_each_issue_gets_fresh_identifier() {
        let user_id = new_user_id();
        let a = Session::issue(user_id.clone(), Duration::hours(1), "d", false);
        let b = Session::issue(user_id, Duration::hours(1), "d", false);
        assert_ne!(a.session_id, b.session_id);
    }
}

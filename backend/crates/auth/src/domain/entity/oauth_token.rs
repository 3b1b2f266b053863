//! OAuth2 Token Entity
//!
//! One issued grant: authorization code, access token and refresh token
//! share a row. The `(code, access, refresh)` triple identifies the row for
//! replace-on-write. `user_id` may be unset when the grant authenticated only
//! the client; the web flow attaches the user afterwards.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::value_object::{client_id::ClientId, user_id::UserId};

#[derive(Debug, Clone, PartialEq)]
pub struct OAuthToken {
    /// `None` when the stored value is blank
    pub client_id: Option<ClientId>,
    /// `None` until a user is attached
    pub user_id: Option<UserId>,
    pub redirect_uri: String,
    pub scope: String,
    pub code: String,
    pub code_expires_in: Duration,
    pub access: String,
    pub access_expires_in: Duration,
    pub refresh: String,
    pub refresh_expires_in: Duration,
    pub created_at: DateTime<Utc>,
}

/// Which credential column a token lookup or delete is keyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKey<'a> {
    Code(&'a str),
    Access(&'a str),
    Refresh(&'a str),
}

impl TokenKey<'_> {
    pub fn value(&self) -> &str {
        match self {
            TokenKey::Code(v) | TokenKey::Access(v) | TokenKey::Refresh(v) => v,
        }
    }
}

impl OAuthToken {
    /// Access token issued to a client with no user attached yet
    pub fn for_client(client_id: ClientId, access: String, scope: String, ttl: Duration) -> Self {
        Self {
            client_id: Some(client_id),
            user_id: None,
            redirect_uri: String::new(),
            scope,
            code: String::new(),
            code_expires_in: Duration::ZERO,
            access,
            access_expires_in: ttl,
            refresh: String::new(),
            refresh_expires_in: Duration::ZERO,
            created_at: Utc::now(),
        }
    }

    /// Same grant, attributed to `user_id`
    pub fn attached_to(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Access is expired once `created_at + access_expires_in <= now`
    ///
    /// A zero lifetime (including an unparseable stored duration) is
    /// therefore always expired.
    pub fn is_access_expired_at(&self, now: DateTime<Utc>) -> bool {
        match chrono::Duration::from_std(self.access_expires_in) {
            Ok(ttl) => match self.created_at.checked_add_signed(ttl) {
                Some(expires_at) => expires_at <= now,
                None => false,
            },
            // Larger than chrono can represent: effectively never expires
            Err(_) => false,
        }
    }

    pub fn same_triple(&self, other: &OAuthToken) -> bool {
        self.code == other.code && self.access == other.access && self.refresh == other.refresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::client_id::new_client_id;
    use crate::domain::value_object::user_id::new_user_id;

    fn token(ttl: Duration) -> OAuthToken {
        OAuthToken::for_client(new_client_id(), "access-1".into(), "read".into(), ttl)
    }

    #[test]
    fn test_access_expiry_boundary() {
        let token = token(Duration::from_secs(60));
        let created = token.created_at;

        assert!(!token.is_access_expired_at(created + chrono::Duration::seconds(59)));
        assert!(token.is_access_expired_at(created + chrono::Duration::seconds(60)));
    }

    #[test]
    fn test_zero_lifetime_is_expired() {
        let token = token(Duration::ZERO);
        assert!(token.is_access_expired_at(token.created_at));
    }

    #[test]
    fn test_attached_to_keeps_triple() {
        let issued = token(Duration::from_secs(60));
        let attached = issued.clone().attached_to(new_user_id());
        assert!(issued.same_triple(&attached));
        assert!(attached.user_id.is_some());
        assert!(issued.user_id.is_none());
    }

    #[test]
    fn test_token_key_value() {
        assert_eq!(TokenKey::Refresh("r").value(), "r");
    }
}

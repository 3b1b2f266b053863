//! OAuth2 Client Entity
//!
//! Machine credential owned by a user. At most one client per user is active
//! at a time; older ones are soft-deleted on rotation.

use chrono::{DateTime, Utc};
use platform::crypto::{constant_time_eq, generate_id};

use crate::domain::value_object::{
    client_id::{ClientId, new_client_id},
    user_id::UserId,
};

#[derive(Debug, Clone, PartialEq)]
pub struct OAuthClient {
    pub client_id: ClientId,
    pub client_secret: String,
    pub domain: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl OAuthClient {
    /// Fresh client with random id and secret
    pub fn generate(user_id: UserId, domain: impl Into<String>) -> Self {
        Self {
            client_id: new_client_id(),
            client_secret: generate_id(),
            domain: domain.into(),
            user_id,
            created_at: Utc::now(),
        }
    }

    /// Constant-time secret check
    pub fn secret_matches(&self, presented: &str) -> bool {
        !self.client_secret.is_empty()
            && constant_time_eq(self.client_secret.as_bytes(), presented.as_bytes())
    }
}

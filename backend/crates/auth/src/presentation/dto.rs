//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::application::{ProfileChanges, SignUpInput};
use crate::domain::entity::oauth_client::OAuthClient;

// ============================================================================
// Users
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Sign up request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company_url: String,
}

impl From<SignUpRequest> for SignUpInput {
    fn from(req: SignUpRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            company_url: req.company_url,
        }
    }
}

/// Profile update request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub company_url: Option<String>,
}

impl From<ProfileRequest> for ProfileChanges {
    fn from(req: ProfileRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            company_url: req.company_url,
        }
    }
}

// ============================================================================
// OAuth2 Clients
// ============================================================================

/// Placeholder returned instead of a stored client secret
pub const REDACTED_SECRET: &str = "";

/// Client as returned over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientView {
    pub client_id: String,
    pub client_secret: String,
    pub domain: String,
    pub user_id: String,
}

impl ClientView {
    /// Includes the secret; only for the response that created the client
    pub fn revealed(client: &OAuthClient) -> Self {
        Self {
            client_secret: client.client_secret.clone(),
            ..Self::redacted(client)
        }
    }

    pub fn redacted(client: &OAuthClient) -> Self {
        Self {
            client_id: client.client_id.to_string(),
            client_secret: REDACTED_SECRET.to_string(),
            domain: client.domain.clone(),
            user_id: client.user_id.to_string(),
        }
    }
}

/// Client list response
#[derive(Debug, Clone, Serialize)]
pub struct ClientsResponse {
    pub clients: Vec<ClientView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_id::UserId;

    #[test]
    fn test_redacted_view_hides_secret() {
        let client = OAuthClient::generate(UserId::from_trusted("u1".to_string()), "localhost".to_string());

        let view = ClientView::redacted(&client);
        assert_eq!(view.client_secret, REDACTED_SECRET);
        assert_eq!(view.client_id, client.client_id.as_str());

        let json = serde_json::to_value(ClientView::revealed(&client)).unwrap();
        assert_eq!(json["client_secret"], client.client_secret.as_str());
        assert_eq!(json["user_id"], "u1");
    }

    #[test]
    fn test_sign_up_request_profile_fields_optional() {
        let req: SignUpRequest = serde_json::from_value(serde_json::json!({
            "email": "jane@example.com",
            "password": "secret",
            "companyUrl": "https://example.com",
        }))
        .unwrap();

        let input = SignUpInput::from(req);
        assert_eq!(input.company_url, "https://example.com");
        assert!(input.first_name.is_empty());
    }
}

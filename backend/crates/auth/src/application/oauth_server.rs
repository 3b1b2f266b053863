//! OAuth2 Grant Engine
//!
//! Validates bearer tokens and runs the token endpoint exchange. Both paths
//! read through the same client/token store, so rotated or soft-deleted
//! credentials are never honored.
//!
//! Only the `client_credentials` grant is supported: nothing in this service
//! hands out authorization codes.

use std::sync::Arc;

use chrono::Utc;
use platform::crypto::generate_id;
use serde::{Deserialize, Serialize};

use crate::application::check_request::UnauthenticatedReason;
use crate::application::config::AuthConfig;
use crate::domain::entity::oauth_token::{OAuthToken, TokenKey};
use crate::domain::repository::{ClientRepository, TokenRepository};
use crate::domain::value_object::{client_id::ClientId, user_id::UserId};
use crate::error::{AuthError, AuthResult};

pub const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";

/// What a valid bearer token grants
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub client_id: ClientId,
    pub user_id: Option<UserId>,
    pub scope: String,
}

/// Token endpoint parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub grant_type: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub scope: String,
}

/// Contract the request checker relies on
#[trait_variant::make(GrantValidator: Send)]
pub trait LocalGrantValidator {
    /// Check a presented access token
    ///
    /// Denials come back as [`AuthError::Unauthenticated`]; anything else is
    /// a storage failure.
    async fn validate_bearer(&self, access_token: &str) -> AuthResult<TokenInfo>;

    /// Run a token endpoint exchange
    async fn handle_token_request(&self, request: TokenRequest) -> AuthResult<TokenResponse>;
}

/// Grant engine backed by the client/token repositories
pub struct OAuthServer<R>
where
    R: ClientRepository + TokenRepository + Send + Sync,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> OAuthServer<R>
where
    R: ClientRepository + TokenRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }
}

impl<R> GrantValidator for OAuthServer<R>
where
    R: ClientRepository + TokenRepository + Send + Sync,
{
    async fn validate_bearer(&self, access_token: &str) -> AuthResult<TokenInfo> {
        let access_token = access_token.trim();
        if access_token.is_empty() {
            return Err(UnauthenticatedReason::InvalidToken.into());
        }

        let token = self
            .repo
            .find_token(TokenKey::Access(access_token))
            .await?
            .ok_or(AuthError::Unauthenticated(UnauthenticatedReason::InvalidToken))?;

        if token.is_access_expired_at(Utc::now()) {
            return Err(UnauthenticatedReason::ExpiredCredential.into());
        }

        let client_id = token
            .client_id
            .ok_or(AuthError::Unauthenticated(UnauthenticatedReason::InvalidToken))?;

        // Tokens die with their client
        if self.repo.find_client_by_id(&client_id).await?.is_none() {
            tracing::debug!(client_id = %client_id, "Bearer token issued by inactive client");
            return Err(UnauthenticatedReason::InvalidToken.into());
        }

        Ok(TokenInfo {
            client_id,
            user_id: token.user_id,
            scope: token.scope,
        })
    }

    async fn handle_token_request(&self, request: TokenRequest) -> AuthResult<TokenResponse> {
        match request.grant_type.trim() {
            "" => return Err(AuthError::BadRequest("missing grant_type".to_string())),
            GRANT_CLIENT_CREDENTIALS => {}
            other => {
                tracing::debug!(grant_type = %other, "Unsupported grant type");
                return Err(AuthError::UnsupportedGrantType);
            }
        }

        let client_id = ClientId::parse(&request.client_id).map_err(|_| AuthError::InvalidClient)?;
        let client = self
            .repo
            .find_client_by_id(&client_id)
            .await?
            .ok_or(AuthError::InvalidClient)?;

        if !client.secret_matches(&request.client_secret) {
            return Err(AuthError::InvalidClient);
        }

        let scope = request.scope.unwrap_or_default();
        let token = OAuthToken::for_client(
            client.client_id,
            generate_id(),
            scope.clone(),
            self.config.access_token_ttl,
        );
        self.repo.create_or_replace_token(&token).await?;

        Ok(TokenResponse {
            access_token: token.access,
            token_type: "Bearer",
            expires_in: self.config.access_token_ttl.as_secs(),
            scope,
        })
    }
}

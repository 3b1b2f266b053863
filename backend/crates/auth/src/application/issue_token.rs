//! Issue Token Use Case
//!
//! Token endpoint for signed-in users. The grant engine authenticates the
//! client only, so the freshly issued token is written back with the
//! session's user attached.

use std::sync::Arc;

use crate::application::check_request::UnauthenticatedReason;
use crate::application::config::AuthConfig;
use crate::application::oauth_server::{GrantValidator, TokenRequest, TokenResponse};
use crate::application::observer::{AuthEvent, SharedObserver};
use crate::application::session_store::SessionStore;
use crate::domain::entity::oauth_token::TokenKey;
use crate::domain::repository::{ClientRepository, SessionRepository, TokenRepository};
use crate::error::{AuthError, AuthResult};

pub struct IssueTokenUseCase<R, G>
where
    R: SessionRepository + ClientRepository + TokenRepository + Send + Sync,
    G: GrantValidator,
{
    repo: Arc<R>,
    grants: Arc<G>,
    sessions: SessionStore<R>,
    config: Arc<AuthConfig>,
    observer: SharedObserver,
}

impl<R, G> IssueTokenUseCase<R, G>
where
    R: SessionRepository + ClientRepository + TokenRepository + Send + Sync,
    G: GrantValidator,
{
    pub fn new(
        repo: Arc<R>,
        grants: Arc<G>,
        config: Arc<AuthConfig>,
        observer: SharedObserver,
    ) -> Self {
        Self {
            sessions: SessionStore::new(repo.clone(), config.clone()),
            repo,
            grants,
            config,
            observer,
        }
    }

    pub async fn execute(
        &self,
        session_cookie: Option<&str>,
        request: TokenRequest,
    ) -> AuthResult<TokenResponse> {
        let cookie = session_cookie
            .ok_or_else(|| AuthError::MissingSession(self.config.session_cookie_name.clone()))?;

        let user_id = self
            .sessions
            .resolve(cookie)
            .await?
            .ok_or(AuthError::Unauthenticated(UnauthenticatedReason::InvalidSession))?;

        let response = self.grants.handle_token_request(request).await?;

        let issued = self
            .repo
            .find_token(TokenKey::Access(&response.access_token))
            .await?
            .ok_or_else(|| AuthError::Internal("issued token not found".to_string()))?;

        // A signed-in user may only mint tokens from their own client
        let owner = match issued.client_id.as_ref() {
            Some(client_id) => self.repo.find_client_by_id(client_id).await?,
            None => None,
        };
        if owner.is_none_or(|client| client.user_id != user_id) {
            self.repo
                .soft_delete_token(TokenKey::Access(&response.access_token))
                .await?;
            return Err(AuthError::InvalidClient);
        }

        self.repo
            .create_or_replace_token(&issued.attached_to(user_id.clone()))
            .await?;

        self.observer.record(AuthEvent::TokenGeneration);
        tracing::info!(user_id = %user_id, "OAuth2 access token issued");

        Ok(response)
    }
}

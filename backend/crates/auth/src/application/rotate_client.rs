//! OAuth2 Client Credential Use Cases
//!
//! Rotation replaces a user's active client with a freshly generated one in
//! a single transaction. The new secret is returned once; list reads get the
//! client with the secret withheld by the presentation layer.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::observer::{AuthEvent, AuthMethod, SharedObserver};
use crate::domain::entity::oauth_client::OAuthClient;
use crate::domain::repository::ClientRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// Rotate client use case
pub struct RotateClientUseCase<R>
where
    R: ClientRepository,
{
    client_repo: Arc<R>,
    config: Arc<AuthConfig>,
    observer: SharedObserver,
}

impl<R> RotateClientUseCase<R>
where
    R: ClientRepository,
{
    pub fn new(client_repo: Arc<R>, config: Arc<AuthConfig>, observer: SharedObserver) -> Self {
        Self {
            client_repo,
            config,
            observer,
        }
    }

    /// Retire every active client of `user_id` and issue exactly one new one
    ///
    /// On failure the previous client stays active and
    /// [`AuthError::RotationConflict`] is returned.
    pub async fn execute(&self, user_id: &UserId) -> AuthResult<Vec<OAuthClient>> {
        if user_id.is_blank() {
            return Err(AuthError::Internal(
                "refusing to rotate clients for a blank user id".to_string(),
            ));
        }

        let replacement = OAuthClient::generate(user_id.clone(), self.config.client_domain.clone());

        let retired = self
            .client_repo
            .rotate_clients(&replacement)
            .await
            .map_err(|e| match e {
                AuthError::Storage(err) => AuthError::RotationConflict(err.to_string()),
                other => other,
            })?;

        for _ in &retired {
            self.observer
                .record(AuthEvent::Inactivation(AuthMethod::OAuth2ViaWeb));
        }
        self.observer.record(AuthEvent::ClientGeneration);

        tracing::info!(
            user_id = %user_id,
            client_id = %replacement.client_id,
            retired = retired.len(),
            "OAuth2 client rotated"
        );

        Ok(vec![replacement])
    }
}

/// List active clients use case
pub struct ListClientsUseCase<R>
where
    R: ClientRepository,
{
    client_repo: Arc<R>,
}

impl<R> ListClientsUseCase<R>
where
    R: ClientRepository,
{
    pub fn new(client_repo: Arc<R>) -> Self {
        Self { client_repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<Vec<OAuthClient>> {
        self.client_repo.find_clients_by_user(user_id).await
    }
}

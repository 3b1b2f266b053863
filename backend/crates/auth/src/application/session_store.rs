//! Session Store
//!
//! Create, resolve and invalidate browser sessions. Expiry is lazy: an
//! expired row resolves exactly like a missing one.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::domain::entity::session::Session;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::{session_id::SessionId, user_id::UserId};
use crate::error::{AuthError, AuthResult};

pub struct SessionStore<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SessionStore<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Issue and persist a session for `user_id`
    pub async fn create(&self, user_id: &UserId) -> AuthResult<Session> {
        if user_id.is_blank() {
            return Err(AuthError::Internal(
                "refusing to create a session for a blank user id".to_string(),
            ));
        }

        let session = Session::issue(
            user_id.clone(),
            self.config.session_ttl_chrono(),
            self.config.cookie_domain.clone(),
            self.config.tls_transport,
        );
        self.session_repo.insert_session(&session).await?;

        tracing::debug!(user_id = %user_id, "Session created");
        Ok(session)
    }

    /// User id of a live session, `None` when unknown or expired
    pub async fn resolve(&self, session_id: &str) -> AuthResult<Option<UserId>> {
        let Ok(session_id) = SessionId::parse(session_id) else {
            return Ok(None);
        };

        let Some(session) = self.session_repo.find_session(&session_id).await? else {
            return Ok(None);
        };

        if session.is_expired_at(Utc::now()) || session.user_id.is_blank() {
            return Ok(None);
        }

        Ok(Some(session.user_id))
    }

    /// Remove the session; unknown ids are not an error
    pub async fn invalidate(&self, session_id: &str) -> AuthResult<()> {
        let Ok(session_id) = SessionId::parse(session_id) else {
            return Ok(());
        };

        let removed = self.session_repo.delete_session(&session_id).await?;
        tracing::debug!(removed, "Session invalidated");
        Ok(())
    }
}

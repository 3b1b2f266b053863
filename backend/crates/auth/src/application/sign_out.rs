//! Sign Out Use Case
//!
//! Invalidates a user session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::observer::{AuthEvent, AuthMethod, SharedObserver};
use crate::application::session_store::SessionStore;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    sessions: SessionStore<S>,
    observer: SharedObserver,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>, observer: SharedObserver) -> Self {
        Self {
            sessions: SessionStore::new(session_repo, config),
            observer,
        }
    }

    /// Sign out from the current session; a missing cookie is a no-op
    pub async fn execute(&self, session_cookie: Option<&str>) -> AuthResult<()> {
        let Some(cookie) = session_cookie else {
            return Ok(());
        };

        self.sessions.invalidate(cookie).await?;
        self.observer
            .record(AuthEvent::Inactivation(AuthMethod::Web));

        tracing::info!("User signed out");
        Ok(())
    }
}

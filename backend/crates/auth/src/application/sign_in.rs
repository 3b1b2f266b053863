//! Sign In Use Case
//!
//! Authenticates a user by email and password and creates a session.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::observer::{AuthEvent, AuthMethod, SharedObserver};
use crate::application::session_store::SessionStore;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{PasswordRepository, SessionRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    pub session: Session,
    pub user: User,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: UserRepository + PasswordRepository + SessionRepository,
{
    repo: Arc<R>,
    sessions: SessionStore<R>,
    observer: SharedObserver,
}

impl<R> SignInUseCase<R>
where
    R: UserRepository + PasswordRepository + SessionRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, observer: SharedObserver) -> Self {
        Self {
            sessions: SessionStore::new(repo.clone(), config),
            repo,
            observer,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        // Malformed input is the caller's problem, not a failed login
        let email = Email::new(&input.email)?;
        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthError::BadRequest(e.to_string()))?;

        let Some(user) = self.repo.find_user_by_email(&email).await? else {
            return Err(self.reject("unknown email"));
        };

        let Some(hash) = self.repo.find_password_hash(&user.user_id).await? else {
            return Err(self.reject("no password set"));
        };

        // Argon2 is deliberately slow; keep it off the async workers
        let valid = tokio::task::spawn_blocking(move || hash.verify(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("password verification task: {e}")))?;

        if !valid {
            tracing::warn!(user_id = %user.user_id, "Password mismatch");
            return Err(self.reject("password mismatch"));
        }

        let session = self.sessions.create(&user.user_id).await?;
        self.observer.record(AuthEvent::Success(AuthMethod::Web));

        tracing::info!(user_id = %user.user_id, "User signed in");

        Ok(SignInOutput { session, user })
    }

    fn reject(&self, why: &'static str) -> AuthError {
        tracing::debug!(reason = why, "Sign in rejected");
        self.observer.record(AuthEvent::Failure(AuthMethod::Web));
        AuthError::InvalidCredentials
    }
}

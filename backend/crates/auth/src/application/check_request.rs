//! Check Request Use Case
//!
//! Decides who an inbound request belongs to. Used by the forward-auth
//! endpoint, which the fronting proxy calls for every request it admits.
//!
//! Resolution order:
//! 1. forwarded `OPTIONS` preflight ⇒ [`CheckOutcome::PreflightBypass`]
//! 2. session cookie present ⇒ decided by the session alone
//! 3. bearer token present ⇒ decided by the grant validator
//! 4. otherwise ⇒ [`UnauthenticatedReason::NoCredential`]

use std::fmt;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::oauth_server::GrantValidator;
use crate::application::observer::{AuthEvent, AuthMethod, SharedObserver};
use crate::application::session_store::SessionStore;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// Credential-bearing parts of an inbound request, free of wire format
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub session_cookie: Option<String>,
    pub bearer_token: Option<String>,
    /// Method of the original client request as replayed by the proxy
    pub forwarded_method: Option<String>,
    pub origin: Option<String>,
}

impl RequestContext {
    /// The proxy replayed a CORS preflight; these never carry credentials
    pub fn is_forwarded_preflight(&self) -> bool {
        is_forwarded_preflight(self.forwarded_method.as_deref())
    }
}

pub fn is_forwarded_preflight(forwarded_method: Option<&str>) -> bool {
    forwarded_method.is_some_and(|m| m.trim().eq_ignore_ascii_case("OPTIONS"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    NoCredential,
    InvalidSession,
    InvalidToken,
    ExpiredCredential,
}

impl fmt::Display for UnauthenticatedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnauthenticatedReason::NoCredential => "no credential presented",
            UnauthenticatedReason::InvalidSession => "invalid session",
            UnauthenticatedReason::InvalidToken => "invalid token",
            UnauthenticatedReason::ExpiredCredential => "expired credential",
        })
    }
}

/// Result of checking a request
///
/// `Authenticated` never carries a blank user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Authenticated(UserId),
    Unauthenticated(UnauthenticatedReason),
    PreflightBypass,
}

impl CheckOutcome {
    fn authenticated(user_id: UserId, on_blank: UnauthenticatedReason) -> Self {
        if user_id.is_blank() {
            CheckOutcome::Unauthenticated(on_blank)
        } else {
            CheckOutcome::Authenticated(user_id)
        }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            CheckOutcome::Authenticated(user_id) => Some(user_id),
            _ => None,
        }
    }
}

/// Check request use case
pub struct CheckRequestUseCase<S, G>
where
    S: SessionRepository,
    G: GrantValidator,
{
    sessions: SessionStore<S>,
    grants: Arc<G>,
    observer: SharedObserver,
}

impl<S, G> CheckRequestUseCase<S, G>
where
    S: SessionRepository,
    G: GrantValidator,
{
    pub fn new(
        session_repo: Arc<S>,
        grants: Arc<G>,
        config: Arc<AuthConfig>,
        observer: SharedObserver,
    ) -> Self {
        Self {
            sessions: SessionStore::new(session_repo, config),
            grants,
            observer,
        }
    }

    /// Full check: cookie first, then bearer token
    ///
    /// Storage failures are returned as `Err`; every other outcome is `Ok`.
    pub async fn execute(&self, ctx: &RequestContext) -> AuthResult<CheckOutcome> {
        if ctx.is_forwarded_preflight() {
            return Ok(CheckOutcome::PreflightBypass);
        }

        if let Some(cookie) = ctx.session_cookie.as_deref() {
            return self.check_cookie(cookie).await;
        }

        if let Some(token) = ctx.bearer_token.as_deref() {
            return self.check_bearer(token).await;
        }

        Ok(CheckOutcome::Unauthenticated(
            UnauthenticatedReason::NoCredential,
        ))
    }

    /// Cookie-only check; a bearer token is ignored
    pub async fn execute_session_only(&self, ctx: &RequestContext) -> AuthResult<CheckOutcome> {
        if ctx.is_forwarded_preflight() {
            return Ok(CheckOutcome::PreflightBypass);
        }

        match ctx.session_cookie.as_deref() {
            Some(cookie) => self.check_cookie(cookie).await,
            None => Ok(CheckOutcome::Unauthenticated(
                UnauthenticatedReason::NoCredential,
            )),
        }
    }

    async fn check_cookie(&self, cookie: &str) -> AuthResult<CheckOutcome> {
        let outcome = match self.sessions.resolve(cookie).await? {
            Some(user_id) => {
                CheckOutcome::authenticated(user_id, UnauthenticatedReason::InvalidSession)
            }
            None => CheckOutcome::Unauthenticated(UnauthenticatedReason::InvalidSession),
        };

        self.report(&outcome, AuthMethod::Web);
        Ok(outcome)
    }

    async fn check_bearer(&self, token: &str) -> AuthResult<CheckOutcome> {
        let outcome = match self.grants.validate_bearer(token).await {
            Ok(info) => match info.user_id {
                Some(user_id) => {
                    CheckOutcome::authenticated(user_id, UnauthenticatedReason::InvalidToken)
                }
                // Token authenticates a client that was never attributed to a user
                None => CheckOutcome::Unauthenticated(UnauthenticatedReason::InvalidToken),
            },
            Err(AuthError::Unauthenticated(reason)) => CheckOutcome::Unauthenticated(reason),
            Err(e) => return Err(e),
        };

        self.report(&outcome, AuthMethod::OAuth2);
        Ok(outcome)
    }

    fn report(&self, outcome: &CheckOutcome, method: AuthMethod) {
        match outcome {
            CheckOutcome::Authenticated(user_id) => {
                tracing::debug!(user_id = %user_id, %method, "Request authenticated");
                self.observer.record(AuthEvent::Success(method));
            }
            CheckOutcome::Unauthenticated(reason) => {
                tracing::debug!(%reason, %method, "Request rejected");
                self.observer.record(AuthEvent::Failure(method));
            }
            CheckOutcome::PreflightBypass => {}
        }
    }
}

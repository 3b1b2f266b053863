//! HTTP Handlers

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use std::sync::Arc;

use platform::cookie::{delete_cookie_header, extract_cookie, set_cookie_header};

use crate::application::config::AuthConfig;
use crate::application::observer::{AuthEvent, AuthMethod, SharedObserver};
use crate::application::{
    CheckOutcome, CheckRequestUseCase, GrantValidator, IssueTokenUseCase, ListClientsUseCase,
    OAuthServer, RequestContext, RotateClientUseCase, SignInInput, SignInUseCase,
    SignOutUseCase, SignUpUseCase, TokenRequest, UpdateProfileUseCase,
};
use crate::domain::entity::user::User;
use crate::domain::repository::AuthRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};
use crate::presentation::context::{X_USER_ID, bearer_token, request_context};
use crate::presentation::dto::{
    ClientView, ClientsResponse, LoginRequest, ProfileRequest, SignUpRequest,
};
use crate::presentation::middleware::{SessionUser, cors_ok};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AuthRepository,
{
    pub repo: Arc<R>,
    pub grants: Arc<OAuthServer<R>>,
    pub config: Arc<AuthConfig>,
    pub observer: SharedObserver,
}

impl<R> AuthAppState<R>
where
    R: AuthRepository,
{
    pub fn new(repo: R, config: AuthConfig, observer: SharedObserver) -> Self {
        let repo = Arc::new(repo);
        let config = Arc::new(config);
        Self {
            grants: Arc::new(OAuthServer::new(repo.clone(), config.clone())),
            repo,
            config,
            observer,
        }
    }

    fn check_use_case(&self) -> CheckRequestUseCase<R, OAuthServer<R>> {
        CheckRequestUseCase::new(
            self.repo.clone(),
            self.grants.clone(),
            self.config.clone(),
            self.observer.clone(),
        )
    }

    fn session_cookie(&self, headers: &HeaderMap) -> Option<String> {
        extract_cookie(headers, &self.config.session_cookie_name)
    }
}

/// GET /ping
pub async fn ping() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], "PONG")
}

// ============================================================================
// Forward Auth
// ============================================================================

/// GET /auth/check
///
/// Called by the fronting proxy for every request it admits.
pub async fn auth_check<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: AuthRepository,
{
    let ctx = request_context(&headers, &state.config.session_cookie_name);
    let outcome = state.check_use_case().execute(&ctx).await?;

    Ok(outcome_response(outcome, &ctx))
}

// ============================================================================
// Web Login
// ============================================================================

/// GET /users/login
pub async fn check_login<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: AuthRepository,
{
    let ctx = request_context(&headers, &state.config.session_cookie_name);

    match state.check_use_case().execute_session_only(&ctx).await? {
        CheckOutcome::Authenticated(user_id) => {
            let user = state
                .repo
                .find_user_by_id(&user_id)
                .await?
                .ok_or(AuthError::UserNotFound)?;
            Ok(user_response(&user))
        }
        other => Ok(outcome_response(other, &ctx)),
    }
}

/// POST /users/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Response>
where
    R: AuthRepository,
{
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.observer.clone(),
    );

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookie = set_cookie_header(
        &state.config.session_cookie(),
        output.session.session_id.as_str(),
    )
    .ok_or_else(|| AuthError::Internal("session cookie is not a valid header".to_string()))?;

    let mut response = user_response(&output.user);
    response.headers_mut().insert(header::SET_COOKIE, cookie);

    Ok(response)
}

/// DELETE /users/logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: AuthRepository,
{
    let cookie = state.session_cookie(&headers);

    let use_case = SignOutUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.observer.clone(),
    );
    use_case.execute(cookie.as_deref()).await?;

    let mut response = StatusCode::OK.into_response();
    if let Some(clear) = delete_cookie_header(&state.config.session_cookie()) {
        response.headers_mut().insert(header::SET_COOKIE, clear);
    }

    Ok(response)
}

// ============================================================================
// Users
// ============================================================================

/// POST /users/create
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<Response>
where
    R: AuthRepository,
{
    let user = SignUpUseCase::new(state.repo.clone())
        .execute(req.into())
        .await?;

    Ok(user_response(&user))
}

/// PATCH /users/{id} (session required)
pub async fn update_profile<R>(
    State(state): State<AuthAppState<R>>,
    Extension(SessionUser(actor)): Extension<SessionUser>,
    Path(user_id): Path<String>,
    Json(req): Json<ProfileRequest>,
) -> AuthResult<Response>
where
    R: AuthRepository,
{
    let target = UserId::parse(&user_id).map_err(|e| AuthError::BadRequest(e.to_string()))?;

    let user = UpdateProfileUseCase::new(state.repo.clone())
        .execute(&actor, &target, req.into())
        .await?;

    Ok(user_response(&user))
}

// ============================================================================
// OAuth2
// ============================================================================

/// GET|POST /oauth2/token
pub async fn token<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Query(req): Query<TokenRequest>,
) -> AuthResult<Response>
where
    R: AuthRepository,
{
    let cookie = state.session_cookie(&headers);

    let use_case = IssueTokenUseCase::new(
        state.repo.clone(),
        state.grants.clone(),
        state.config.clone(),
        state.observer.clone(),
    );

    let issued = use_case.execute(cookie.as_deref(), req).await?;

    Ok(([(header::CACHE_CONTROL, "no-store")], Json(issued)).into_response())
}

/// GET /oauth2/authorize
pub async fn authorize<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: AuthRepository,
{
    let Some(token) = bearer_token(&headers) else {
        state.observer.record(AuthEvent::Failure(AuthMethod::OAuth2));
        return Ok(StatusCode::FORBIDDEN.into_response());
    };

    match state.grants.validate_bearer(&token).await {
        Ok(info) => {
            tracing::debug!(client_id = %info.client_id, "Bearer token authorized");
            state.observer.record(AuthEvent::Success(AuthMethod::OAuth2));
            Ok(StatusCode::OK.into_response())
        }
        Err(AuthError::Unauthenticated(reason)) => {
            tracing::debug!(%reason, "Bearer token rejected");
            state.observer.record(AuthEvent::Failure(AuthMethod::OAuth2));
            Ok(StatusCode::FORBIDDEN.into_response())
        }
        Err(e) => Err(e),
    }
}

/// POST /oauth2/token/recreate (session required)
pub async fn recreate<R>(
    State(state): State<AuthAppState<R>>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
) -> AuthResult<Json<ClientsResponse>>
where
    R: AuthRepository,
{
    let use_case = RotateClientUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.observer.clone(),
    );

    let clients = use_case.execute(&user_id).await?;

    Ok(Json(ClientsResponse {
        clients: clients.iter().map(ClientView::revealed).collect(),
    }))
}

/// GET /oauth2/clients (session required)
pub async fn list_clients<R>(
    State(state): State<AuthAppState<R>>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
) -> AuthResult<Json<ClientsResponse>>
where
    R: AuthRepository,
{
    let clients = ListClientsUseCase::new(state.repo.clone())
        .execute(&user_id)
        .await?;

    Ok(Json(ClientsResponse {
        clients: clients.iter().map(ClientView::redacted).collect(),
    }))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Wire form of a check outcome; failures are a bare 403
fn outcome_response(outcome: CheckOutcome, ctx: &RequestContext) -> Response {
    match outcome {
        CheckOutcome::Authenticated(user_id) => {
            (StatusCode::OK, [(X_USER_ID, user_id.to_string())]).into_response()
        }
        CheckOutcome::PreflightBypass => cors_ok(ctx.origin.as_deref()),
        CheckOutcome::Unauthenticated(_) => StatusCode::FORBIDDEN.into_response(),
    }
}

fn user_response(user: &User) -> Response {
    (
        StatusCode::OK,
        [(X_USER_ID, user.user_id.to_string())],
        Json(user),
    )
        .into_response()
}

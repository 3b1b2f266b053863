//! Auth Middleware
//!
//! Session gate for protected routes and the CORS allow headers.

use axum::extract::{Request, State};
use axum::http::{Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use platform::cookie::extract_cookie;
use platform::cors::apply_access_control;

use crate::application::check_request::UnauthenticatedReason;
use crate::application::session_store::SessionStore;
use crate::domain::repository::AuthRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// User resolved from the session cookie, stored in request extensions
#[derive(Debug, Clone)]
pub struct SessionUser(pub UserId);

/// Middleware that requires a valid session cookie
pub async fn require_session<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: AuthRepository,
{
    let cookie = extract_cookie(req.headers(), &state.config.session_cookie_name)
        .ok_or_else(|| AuthError::MissingSession(state.config.session_cookie_name.clone()))?;

    let sessions = SessionStore::new(state.repo.clone(), state.config.clone());
    let user_id = sessions
        .resolve(&cookie)
        .await?
        .ok_or(AuthError::Unauthenticated(UnauthenticatedReason::InvalidSession))?;

    req.extensions_mut().insert(SessionUser(user_id));

    Ok(next.run(req).await)
}

/// Answers bare `OPTIONS` requests and echoes CORS headers on everything else
pub async fn access_control(req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if req.method() == Method::OPTIONS {
        return preflight_response(origin.as_deref());
    }

    let mut response = next.run(req).await;
    if let Some(origin) = origin {
        apply_access_control(response.headers_mut(), &origin);
    }
    response
}

/// Browser preflight: 400 without an `Origin`
pub fn preflight_response(origin: Option<&str>) -> Response {
    match origin.filter(|o| !o.is_empty()) {
        Some(origin) => cors_ok(Some(origin)),
        None => {
            tracing::debug!("Preflight without origin");
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}

/// 200 with the allow headers for `origin`, if it qualifies
pub fn cors_ok(origin: Option<&str>) -> Response {
    let mut response = ([(header::CONTENT_TYPE, "text/plain")], StatusCode::OK).into_response();
    if let Some(origin) = origin {
        apply_access_control(response.headers_mut(), origin);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preflight_requires_origin() {
        assert_eq!(preflight_response(None).status(), StatusCode::BAD_REQUEST);
        assert_eq!(preflight_response(Some("")).status(), StatusCode::BAD_REQUEST);

        let response = preflight_response(Some("http://localhost:3000"));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }

    #[test]
    fn test_cors_ok_skips_foreign_origin() {
        let response = cors_ok(Some("http://evil.example.com"));
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            !response
                .headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }
}
